//! Resource access seam. The scene core never touches the filesystem directly;
//! everything goes through a [`ResourceProvider`].

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

pub trait ResourceProvider {
    fn text_resource(&self, path: &Path) -> io::Result<String>;
    fn binary_resource(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn text_resource(&self, path: &Path) -> io::Result<String> {
        (**self).text_resource(path)
    }

    fn binary_resource(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).binary_resource(path)
    }
}

/// Reads resources from a directory on disk. Relative paths resolve against `root`.
#[derive(Clone, Debug)]
pub struct FsResourceProvider {
    root: PathBuf,
}

impl FsResourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ResourceProvider for FsResourceProvider {
    fn text_resource(&self, path: &Path) -> io::Result<String> {
        let full = self.resolve(path);
        log::debug!("Reading text resource {:?}", full);
        fs::read_to_string(full)
    }

    fn binary_resource(&self, path: &Path) -> io::Result<Vec<u8>> {
        let full = self.resolve(path);
        log::debug!("Reading binary resource {:?}", full);
        fs::read(full)
    }
}

/// In-memory resources keyed by path, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryResourceProvider {
    entries: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    fn get(&self, path: &Path) -> io::Result<&[u8]> {
        self.entries.get(path).map(Vec::as_slice).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no resource registered at {}", path.display()),
            )
        })
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn text_resource(&self, path: &Path) -> io::Result<String> {
        let bytes = self.get(path)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn binary_resource(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.get(path).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_provider_round_trips_text_and_bytes() {
        let provider = MemoryResourceProvider::new()
            .with("scene/a.gltf", "{}")
            .with("scene/a.bin", vec![1u8, 2, 3]);

        assert_eq!(provider.text_resource(Path::new("scene/a.gltf")).unwrap(), "{}");
        assert_eq!(
            provider.binary_resource(Path::new("scene/a.bin")).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn memory_provider_missing_entry_is_not_found() {
        let provider = MemoryResourceProvider::new();
        let err = provider.binary_resource(Path::new("nope.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn fs_provider_resolves_relative_paths_against_root() {
        let provider = FsResourceProvider::new("/srv/assets");
        assert_eq!(
            provider.resolve(Path::new("models/box.gltf")),
            PathBuf::from("/srv/assets/models/box.gltf")
        );
        assert_eq!(
            provider.resolve(Path::new("/abs/box.gltf")),
            PathBuf::from("/abs/box.gltf")
        );
    }
}
