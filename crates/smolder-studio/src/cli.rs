use clap::Parser;

use smolder_fx::{AmbientPolicy, SceneConfig};

#[derive(Parser, Debug)]
#[command(
    name = "smolder-studio",
    version,
    about = "Rotating RGB triangle with ambient particles, a vignette and clickable controls"
)]
pub struct Cli {
    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 900.0)]
    pub width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Number of ambient particles.
    #[arg(long, value_name = "COUNT", default_value_t = 64)]
    pub particles: usize,

    /// Seed for particle spawning; omit for a different ambience every run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Freeze ambient particles while the ambient layer is toggled off.
    #[arg(long)]
    pub pause_hidden_ambient: bool,

    /// Vignette opacity at the corners, 0 to 1.
    #[arg(long, value_name = "STRENGTH", default_value_t = 0.6)]
    pub vignette: f32,

    /// Log filter in `env_logger` syntax (e.g. `debug`, `smolder_fx=debug`).
    #[arg(long, env = "SMOLDER_LOG")]
    pub log: Option<String>,
}

impl Cli {
    /// Scene configuration with the command line applied over the defaults.
    pub fn scene_config(&self) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.particles.count = self.particles;
        config.vignette_strength = self.vignette.clamp(0.0, 1.0);
        if self.pause_hidden_ambient {
            config.ambient_policy = AmbientPolicy::PauseWhenHidden;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_defaults() {
        let cli = Cli::try_parse_from(["smolder-studio"]).unwrap();
        assert_eq!(cli.width, 900.0);
        assert_eq!(cli.height, 600.0);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.scene_config(), SceneConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "smolder-studio",
            "--particles",
            "10",
            "--seed",
            "7",
            "--pause-hidden-ambient",
            "--vignette",
            "0.25",
        ])
        .unwrap();

        let config = cli.scene_config();
        assert_eq!(cli.seed, Some(7));
        assert_eq!(config.particles.count, 10);
        assert_eq!(config.vignette_strength, 0.25);
        assert_eq!(config.ambient_policy, AmbientPolicy::PauseWhenHidden);
    }

    #[test]
    fn vignette_is_clamped() {
        let cli = Cli::try_parse_from(["smolder-studio", "--vignette", "3"]).unwrap();
        assert_eq!(cli.scene_config().vignette_strength, 1.0);
    }

    #[test]
    fn rejects_non_numeric_size() {
        assert!(Cli::try_parse_from(["smolder-studio", "--width", "wide"]).is_err());
    }
}
