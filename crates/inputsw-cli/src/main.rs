//! Monitor Input Switch: change a monitor's active input over DDC/CI.
//!
//! Sends VCP 0x60 (Input Source Select) through `m1ddc` on Apple Silicon
//! Macs or `ControlMyMonitor.exe` on Windows. Every command checks the
//! platform and tool setup first and refuses to run anything that can't
//! work.

use clap::{Parser, Subcommand};
use inputsw_core::config::{self, InputTarget};
use inputsw_core::validate::{resolve_tool, validate};
use inputsw_core::platform::classify;
use inputsw_core::{Config, PlatformInfo, SystemRunner};
use inputsw_ddc::{discover_with, prepare_switch, switch_to, SwitchReport};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod render;

#[derive(Parser)]
#[command(
    name = "monitor-input-switch",
    version,
    about = "Switch monitor inputs over DDC/CI",
    long_about = "Switches a monitor between DisplayPort, HDMI or any other input by\n\
        sending DDC/CI VCP code 0x60 (Input Source Select).\n\n\
        Uses m1ddc on Apple Silicon Macs and NirSoft ControlMyMonitor on Windows."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the command that would run without running it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch to an input: "dp", "hdmi" or a raw VCP 0x60 value
    Switch {
        #[arg(value_parser = parse_target)]
        target: InputTarget,
    },

    /// Switch to the configured DisplayPort input
    #[command(alias = "displayport")]
    Dp,

    /// Switch to the configured HDMI input
    Hdmi,

    /// Show the current input value and connected monitors
    Discover,

    /// Check platform support and tool setup
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print config file path
    Path,
    /// Reset config to defaults
    Reset,
}

fn parse_target(s: &str) -> Result<InputTarget, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "dp" | "displayport" => Ok(InputTarget::DisplayPort),
        "hdmi" => Ok(InputTarget::Hdmi),
        other => other.parse::<u32>().map(InputTarget::Code).map_err(|_| {
            format!(
                "expected \"dp\", \"hdmi\" or a non-negative input code, got \"{}\"",
                s
            )
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logger filters at debug; the effective level is set through
    // `log::set_max_level` so the config file can raise it after loading.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .init();
    log::set_max_level(if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let cfg_path = cli.config.clone().unwrap_or_else(config::config_path);

    if let Commands::Config { action } = cli.command {
        return cmd_config(action, &cfg_path);
    }

    let cfg = Config::load_from(&cfg_path);
    if cfg.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }
    let platform = classify();
    log::debug!("platform: {:?}", platform);

    let code = match cli.command {
        Commands::Switch { target } => cmd_switch(target, &platform, &cfg, cli.dry_run),
        Commands::Dp => cmd_switch(InputTarget::DisplayPort, &platform, &cfg, cli.dry_run),
        Commands::Hdmi => cmd_switch(InputTarget::Hdmi, &platform, &cfg, cli.dry_run),
        Commands::Discover => cmd_discover(&platform, &cfg),
        Commands::Check => cmd_check(&platform, &cfg, &cfg_path),
        Commands::Config { .. } => unreachable!("handled above"),
    };
    Ok(code)
}

// ============================================================================
// Command implementations
// ============================================================================

fn cmd_switch(target: InputTarget, platform: &PlatformInfo, cfg: &Config, dry_run: bool) -> ExitCode {
    if dry_run {
        return match prepare_switch(target, platform, cfg) {
            Ok(prepared) => {
                if let Some(ref reason) = prepared.warning {
                    render::warning(reason);
                }
                println!(
                    "[DRY RUN] Would switch to {} (input {})",
                    target, prepared.input_value
                );
                println!("[DRY RUN] {}", prepared.invocation.command_line());
                ExitCode::SUCCESS
            }
            Err(blocked) => {
                render::blocked(&blocked);
                ExitCode::FAILURE
            }
        };
    }

    match switch_to(target, platform, cfg, &SystemRunner) {
        SwitchReport::Blocked(blocked) => {
            render::blocked(&blocked);
            ExitCode::FAILURE
        }
        SwitchReport::Dispatched {
            target,
            warning,
            result,
        } => {
            if let Some(ref reason) = warning {
                render::warning(reason);
            }
            println!("[INFO] Switching to {}...", target);
            render::dispatch(&result);
            if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn cmd_discover(platform: &PlatformInfo, cfg: &Config) -> ExitCode {
    match discover_with(platform, cfg, &SystemRunner) {
        Ok(report) => {
            print!("{}", report.render());
            ExitCode::SUCCESS
        }
        Err(blocked) => {
            render::blocked(&blocked);
            ExitCode::FAILURE
        }
    }
}

fn cmd_check(platform: &PlatformInfo, cfg: &Config, cfg_path: &Path) -> ExitCode {
    println!("═══ Monitor Input Switch Check ═══\n");
    render::platform(platform);

    println!("\n── Config ──");
    println!("  File:            {}", cfg_path.display());
    println!("  DisplayPort:     {}", cfg.displayport_input);
    println!("  HDMI:            {}", cfg.hdmi_input);
    println!("  Monitor:         {}", cfg.monitor_id);

    println!("\n── Tool ──");
    match resolve_tool(platform, cfg) {
        Ok(path) => println!("  Found:           {}", path.display()),
        Err(e) => println!("  Not available:   {}", e.title()),
    }

    println!();
    let outcome = validate(platform, cfg);
    render::validation(&outcome);
    if outcome.is_blocking() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_config(action: Option<ConfigAction>, path: &Path) -> Result<ExitCode, Box<dyn Error>> {
    match action {
        None | Some(ConfigAction::Show) => {
            let cfg = Config::load_from(path);
            println!("Config file: {}\n", path.display());
            println!("── Input Codes ──");
            println!("  displayport_input    = \"{}\"", cfg.displayport_input);
            println!("  hdmi_input           = \"{}\"", cfg.hdmi_input);
            println!("\n── External Tools ──");
            println!("  windows_tool_path    = \"{}\"", cfg.windows_tool_path);
            println!("  macos_tool_path      = \"{}\"", cfg.macos_tool_path);
            println!("  monitor_id           = \"{}\"", cfg.monitor_id);
            println!("\n── Timing ──");
            println!("  command_timeout_secs = {}", cfg.command_timeout_secs);
            println!("\n── Debug ──");
            println!("  verbose              = {}", cfg.verbose);
        }
        Some(ConfigAction::Path) => {
            println!("{}", path.display());
        }
        Some(ConfigAction::Reset) => {
            Config::write_default(path)?;
            println!("[OK] Config reset to defaults at {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
