use std::path::PathBuf;

use clap::Parser;

use hullplot_engine::device::GpuInit;
use hullplot_engine::{Color, Rgba8};

/// hullplot: orbit around a point cloud or convex hull log.
#[derive(Parser, Debug)]
#[command(name = "hullplot", version, about)]
pub struct Args {
    /// JSON dataset: a `[[x, y, z], ...]` list or a hull log with `Cloud`/`Index`.
    pub file: PathBuf,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1024.0)]
    pub width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 768.0)]
    pub height: f64,

    /// Point color as `#rrggbb[aa]`.
    #[arg(long, default_value = "#ff3030", value_parser = parse_rgba8)]
    pub point_color: Rgba8,

    /// Facet fill color as `#rrggbb[aa]`.
    #[arg(long, default_value = "#3a6ea5", value_parser = parse_rgba8)]
    pub mesh_color: Rgba8,

    /// Facet edge color as `#rrggbb[aa]`.
    #[arg(long, default_value = "#e0e0e0", value_parser = parse_rgba8)]
    pub edge_color: Rgba8,

    /// Background color as `#rrggbb`.
    #[arg(long, default_value = "#101418", value_parser = parse_color)]
    pub background: Color,

    /// Draw facets from both sides.
    #[arg(long)]
    pub double_sided: bool,

    /// Present without waiting for vertical blank when the display allows it.
    #[arg(long)]
    pub no_vsync: bool,

    /// Prefer the integrated / low-power GPU.
    #[arg(long)]
    pub low_power: bool,

    /// Log filter override (env_logger syntax, e.g. `debug` or `hullplot_engine=debug`).
    #[arg(long)]
    pub log_filter: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

impl Args {
    pub fn gpu_init(&self) -> GpuInit {
        let init = GpuInit::default().with_vsync(!self.no_vsync);
        if self.low_power { init.low_power() } else { init }
    }
}

fn parse_rgba8(s: &str) -> Result<Rgba8, String> {
    Rgba8::from_hex(s).ok_or_else(|| format!("invalid color {s:?}, expected #rrggbb or #rrggbbaa"))
}

fn parse_color(s: &str) -> Result<Color, String> {
    parse_rgba8(s).map(Color::from_rgba8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let args = Args::try_parse_from(["hullplot", "hull.json"]).unwrap();
        assert_eq!(args.file, PathBuf::from("hull.json"));
        assert_eq!(args.point_color, Rgba8::opaque(0xff, 0x30, 0x30));
        assert!(!args.double_sided);
        assert!(args.log_filter.is_none());
    }

    #[test]
    fn colors_parse_from_hex() {
        let args = Args::try_parse_from([
            "hullplot",
            "cloud.json",
            "--mesh-color",
            "#00ff0080",
            "--background",
            "000000",
        ])
        .unwrap();
        assert_eq!(args.mesh_color, Rgba8::new(0, 255, 0, 128));
        assert_eq!(args.background, Color::BLACK);
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(Args::try_parse_from(["hullplot", "a.json", "--edge-color", "red"]).is_err());
    }

    #[test]
    fn gpu_flags_reach_init() {
        let args = Args::try_parse_from(["hullplot", "a.json"]).unwrap();
        let init = args.gpu_init();
        assert!(init.vsync);
        assert_eq!(init.power_preference, GpuInit::default().power_preference);

        let args = Args::try_parse_from(["hullplot", "a.json", "--no-vsync", "--low-power"]).unwrap();
        let init = args.gpu_init();
        assert!(!init.vsync);
        assert_eq!(init.power_preference, GpuInit::default().low_power().power_preference);
        assert_ne!(init.power_preference, GpuInit::default().power_preference);
    }

    #[test]
    fn file_is_required() {
        assert!(Args::try_parse_from(["hullplot"]).is_err());
    }
}
