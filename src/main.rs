#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::process::ExitCode;

use toroidal_life::codec::{HeaderPolicy, RenderMode};
use toroidal_life::config::RunConfig;
use toroidal_life::engine::EngineKind;
use toroidal_life::error::{LifeError, Result};
use toroidal_life::simulation::{self, Interrupt};
use toroidal_life::timing::Timing;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: toroidal-life --load FILE --save FILE [--generations N] [--measure] \
[--mode seq|omp|ocl] [--threads N] [--platformId N] [--deviceId N] [--neighbors] \
[--lenient-header] [--list-devices] [--verbose]";

struct MainArgs {
    config: RunConfig,
    measure: bool,
    verbose: bool,
    list_devices: bool,
}

fn parse_args() -> Result<MainArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut load = None;
    let mut save = None;
    let mut generations = None;
    let mut mode = EngineKind::default();
    let mut threads = None;
    let mut platform = 0usize;
    let mut device = 0usize;
    let mut render_mode = RenderMode::Plain;
    let mut header_policy = HeaderPolicy::Strict;
    let mut measure = false;
    let mut verbose = false;
    let mut list_devices = false;

    let next_arg = |i: usize, flag: &str| -> Result<&str> {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| LifeError::InvalidArgument(format!("{flag} requires a value")))
    };
    let number = |value: &str, flag: &str| -> Result<usize> {
        value.parse().map_err(|_| {
            LifeError::InvalidArgument(format!("{flag} requires a non-negative integer"))
        })
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--load" => {
                i += 1;
                load = Some(next_arg(i, flag)?.to_string());
            }
            "--save" => {
                i += 1;
                save = Some(next_arg(i, flag)?.to_string());
            }
            "--generations" => {
                i += 1;
                generations = Some(number(next_arg(i, flag)?, flag)? as u64);
            }
            "--mode" => {
                i += 1;
                mode = next_arg(i, flag)?.parse()?;
            }
            "--threads" => {
                i += 1;
                threads = Some(number(next_arg(i, flag)?, flag)?);
            }
            "--platformId" => {
                i += 1;
                platform = number(next_arg(i, flag)?, flag)?;
            }
            "--deviceId" => {
                i += 1;
                device = number(next_arg(i, flag)?, flag)?;
            }
            "--measure" => measure = true,
            "--neighbors" => render_mode = RenderMode::Neighbors,
            "--lenient-header" => header_policy = HeaderPolicy::Fallback,
            "--list-devices" => list_devices = true,
            "--verbose" => verbose = true,
            other => {
                return Err(LifeError::InvalidArgument(format!(
                    "unknown argument: {other}\n{USAGE}"
                )));
            }
        }
        i += 1;
    }

    if list_devices {
        return Ok(MainArgs {
            config: RunConfig::new("", ""),
            measure,
            verbose,
            list_devices,
        });
    }

    let load = load.ok_or_else(|| LifeError::InvalidArgument(format!("--load is required\n{USAGE}")))?;
    let save = save.ok_or_else(|| LifeError::InvalidArgument(format!("--save is required\n{USAGE}")))?;

    let mut config = RunConfig::new(load, save)
        .engine(mode)
        .platform(platform)
        .device(device)
        .render_mode(render_mode)
        .header_policy(header_policy);
    if let Some(n) = generations {
        config = config.generations(n);
    }
    if let Some(n) = threads {
        config = config.threads(n);
    }

    Ok(MainArgs {
        config,
        measure,
        verbose,
        list_devices,
    })
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "offload")]
fn list_devices() {
    let adapters = toroidal_life::offload::enumerate_adapters();
    if adapters.is_empty() {
        println!("no compute devices found");
    }
    for adapter in adapters {
        println!(
            "platform {} device {}: {} ({:?}, {:?})",
            adapter.platform, adapter.device, adapter.name, adapter.backend, adapter.device_type
        );
    }
}

#[cfg(not(feature = "offload"))]
fn list_devices() {
    println!("built without the `offload` feature");
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    setup_logging(args.verbose);

    if args.list_devices {
        list_devices();
        return ExitCode::SUCCESS;
    }

    let mut timing = Timing::new();
    let report = match simulation::run(&args.config, &mut timing, &Interrupt::new()) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        generations = report.generations,
        population = report.board.population(),
        "run finished"
    );

    if args.measure {
        for (phase, elapsed) in timing.durations() {
            println!("{phase}: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
        }
    }
    ExitCode::SUCCESS
}
