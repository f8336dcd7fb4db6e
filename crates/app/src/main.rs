//! Entry point for Kiln3D.
//! Logging + CLI flags: backend, FPS log, window size, scene file, update rate.

use std::path::PathBuf;

use anyhow::Result;
use corelib::EngineConfig;
use platform::RunOptions;

fn parse_backend_arg<I, S>(args: I) -> wgpu::Backends
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in args {
        if let Some(val) = arg.as_ref().strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_show_fps_arg<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // --show-fps[=on|off], off by default
    for arg in args {
        let arg = arg.as_ref();
        if arg == "--show-fps" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--show-fps=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_size_args<I, S>(args: I) -> (u32, u32)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        let arg = arg.as_ref();
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(EngineConfig::DEFAULT_WIDTH).max(1);
    let hh = h.unwrap_or(EngineConfig::DEFAULT_HEIGHT).max(1);
    (ww, hh)
}

fn parse_scene_arg<I, S>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .filter_map(|a| a.as_ref().strip_prefix("--scene=").map(PathBuf::from))
        .filter(|p| !p.as_os_str().is_empty())
        .last()
}

fn parse_update_rate_arg<I, S>(args: I) -> f64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rate = EngineConfig::DEFAULT_UPDATE_RATE;
    for arg in args {
        if let Some(v) = arg.as_ref().strip_prefix("--update-rate=") {
            match v.parse::<f64>() {
                Ok(hz) => rate = hz,
                Err(_) => log::warn!("Ignoring unparsable update rate '{}'", v),
            }
        }
    }
    rate
}

fn parse_options(args: &[String]) -> RunOptions {
    let (width, height) = parse_size_args(args);
    RunOptions {
        backends: parse_backend_arg(args),
        show_fps: parse_show_fps_arg(args),
        config: EngineConfig {
            width,
            height,
            target_update_rate: parse_update_rate_arg(args),
            ..EngineConfig::default()
        },
        scene: parse_scene_arg(args),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_options(&args);
    options.config.validate()?;
    log::info!(
        "Starting {}. Backend: {:?}, show_fps={}, window_size={}x{}, update_rate={}Hz, scene={:?}",
        options.config.title,
        options.backends,
        options.show_fps,
        options.config.width,
        options.config.height,
        options.config.target_update_rate,
        options.scene
    );

    platform::run_with_renderer(options)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
