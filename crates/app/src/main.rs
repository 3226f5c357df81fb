//! Entry point: renders the demo scene headlessly.
//!
//! Flags: `--size=WxH`, `--width=`, `--height=`, `--frames=`, `--threads=`,
//! `--out=DIR` (write PNG frames), `--show-fps[=on|off]`.

mod demo;

use std::path::PathBuf;

use anyhow::Result;
use platform::RunConfig;

fn parse_show_fps_arg(args: &[String]) -> bool {
    // --show-fps[=on|off], off by default
    for arg in args {
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

fn parse_size_args(args: &[String]) -> (usize, usize) {
    let mut w: Option<usize> = None;
    let mut h: Option<usize> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<usize>(), sh.parse::<usize>()) {
                    w = Some(pw);
                    h = Some(ph);
                    continue;
                }
            }
            log::warn!("Ignoring malformed '{arg}', expected --size=WxH");
        } else if let Some(v) = arg.strip_prefix("--width=") {
            w = parse_number(arg, v).or(w);
        } else if let Some(v) = arg.strip_prefix("--height=") {
            h = parse_number(arg, v).or(h);
        }
    }

    let ww = w.unwrap_or(640).max(1);
    let hh = h.unwrap_or(360).max(1);
    (ww, hh)
}

/// Last `--<name>=N` wins; malformed values warn and are skipped.
fn parse_count_arg(args: &[String], name: &str) -> Option<usize> {
    let prefix = format!("--{name}=");
    args.iter()
        .filter_map(|arg| arg.strip_prefix(&prefix).and_then(|v| parse_number(arg, v)))
        .last()
}

fn parse_out_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .filter_map(|arg| arg.strip_prefix("--out="))
        .filter(|v| !v.is_empty())
        .last()
        .map(PathBuf::from)
}

fn parse_number(arg: &str, value: &str) -> Option<usize> {
    match value.parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("Ignoring '{arg}': '{value}' is not a number");
            None
        }
    }
}

fn run_config(args: &[String]) -> RunConfig {
    let defaults = RunConfig::default();
    let (width, height) = parse_size_args(args);
    RunConfig {
        width,
        height,
        frames: parse_count_arg(args, "frames").unwrap_or(defaults.frames),
        threads: parse_count_arg(args, "threads").unwrap_or(defaults.threads),
        show_fps: parse_show_fps_arg(args),
        out_dir: parse_out_arg(args),
        background: demo::SKY,
        ..defaults
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = run_config(&args);
    log::info!(
        "Starting rasterizer demo: size={}x{}, frames={}, threads={}, show_fps={}, out={:?}",
        config.width,
        config.height,
        config.frames,
        config.threads,
        config.show_fps,
        config.out_dir
    );

    let mut scene = demo::DemoScene::new()?;
    let mut presenter = config.presenter()?;
    platform::run_headless(&mut scene, presenter.as_mut(), &config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_flags() {
        let config = run_config(&[]);
        assert_eq!((config.width, config.height), (640, 360));
        assert_eq!(config.frames, RunConfig::default().frames);
        assert_eq!(config.threads, 0);
        assert!(!config.show_fps);
        assert!(config.out_dir.is_none());
    }

    #[test]
    fn size_forms() {
        assert_eq!(parse_size_args(&args(&["--size=320X200"])), (320, 200));
        assert_eq!(parse_size_args(&args(&["--size=320x200", "--height=50"])), (320, 50));
        assert_eq!(parse_size_args(&args(&["--width=0"])), (1, 360));
        assert_eq!(parse_size_args(&args(&["--size=big"])), (640, 360));
    }

    #[test]
    fn counts_and_output() {
        let config = run_config(&args(&[
            "--frames=3",
            "--threads=x",
            "--out=frames",
            "--show-fps=on",
        ]));
        assert_eq!(config.frames, 3);
        assert_eq!(config.threads, 0);
        assert_eq!(config.out_dir, Some(PathBuf::from("frames")));
        assert!(config.show_fps);
    }

    #[test]
    fn show_fps_forms() {
        assert!(parse_show_fps_arg(&args(&["--show-fps"])));
        assert!(!parse_show_fps_arg(&args(&["--show-fps=off"])));
        assert!(parse_show_fps_arg(&args(&["--show-fps=YES"])));
    }
}
