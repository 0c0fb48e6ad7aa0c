#![deny(unsafe_code)]
//! CLI binary for the art-forge image generators.
//!
//! Subcommands:
//! - `render <generator>`: build an image from JSON params and a seed, write PNG
//! - `list`: print available generators
//! - `schema <generator>`: print a generator's parameter schema

mod error;

use art_forge_core::{CancelToken, Generator, Recipe, Xorshift64};
use art_forge_generators::history::{self, RunRecord};
use art_forge_generators::{clock_seed, naming, snapshot, GeneratorKind};
use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "art-forge", about = "Procedural image generators")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one or more images and write them as PNG.
    Render {
        /// Generator name (see `list`).
        generator: String,

        /// Generator parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// PRNG seed. Taken from the system clock when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of images; run `i` uses seed `seed + i`.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        runs: u32,

        /// Directory for generated images.
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Exact output file, overriding `--output-dir` and the generated name.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file that records every run.
        #[arg(long, default_value = "run_logs.json")]
        history: PathBuf,

        /// Do not record runs in the history file.
        #[arg(long)]
        no_history: bool,
    },
    /// List available generators.
    List,
    /// Print the parameter schema of a generator.
    Schema {
        generator: String,
    },
}

struct RenderArgs {
    generator: String,
    params: String,
    seed: Option<u64>,
    runs: u32,
    output_dir: PathBuf,
    output: Option<PathBuf>,
    history: Option<PathBuf>,
}

fn render(args: RenderArgs, json: bool) -> Result<(), CliError> {
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }

    let gen = GeneratorKind::from_name(&args.generator, &params)?;
    let resolved = gen.params();
    let seed = args.seed.unwrap_or_else(|| {
        let seed = clock_seed();
        info!("no --seed given, using {seed}");
        seed
    });
    // Nothing cancels this token; an interrupted run leaves no partial PNG.
    let cancel = CancelToken::new();

    let mut rendered = Vec::new();
    for run in 0..args.runs {
        let run_seed = seed.wrapping_add(u64::from(run));
        let mut rng = Xorshift64::new(run_seed);
        let canvas = gen.render(&mut rng, &cancel)?;

        let path = match &args.output {
            Some(path) => numbered_path(path, run, args.runs),
            None => {
                let stem = naming::batch_stem(&naming::output_stem_now(&gen), run, args.runs);
                args.output_dir.join(format!("{stem}.png"))
            }
        };
        snapshot::write_png(&canvas, &path)?;
        info!(
            "saved {} ({}x{}, seed {run_seed})",
            path.display(),
            canvas.width(),
            canvas.height()
        );

        let output = path.display().to_string();
        if let Some(history_path) = &args.history {
            let recipe = Recipe::new(gen.name(), run_seed).with_params(resolved.clone());
            history::append_or_warn(history_path, RunRecord::now(recipe, Some(output.clone())));
        }
        rendered.push(serde_json::json!({
            "generator": gen.name(),
            "seed": run_seed,
            "width": canvas.width(),
            "height": canvas.height(),
            "output": output,
        }));
    }

    if json {
        let info = serde_json::json!({ "params": resolved, "runs": rendered });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        for run in &rendered {
            eprintln!(
                "rendered {} (seed {}) -> {}",
                args.generator,
                run["seed"],
                run["output"].as_str().unwrap_or_default()
            );
        }
    }
    Ok(())
}

/// `out.png` for a single run; `out_0.png`, `out_1.png`, ... for a batch.
fn numbered_path(path: &Path, run: u32, runs: u32) -> PathBuf {
    if runs <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    path.with_file_name(format!("{}.{ext}", naming::batch_stem(&stem, run, runs)))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let names = GeneratorKind::list_generators();
            if cli.json {
                let info: Vec<_> = names
                    .iter()
                    .map(|name| {
                        serde_json::json!({
                            "name": name,
                            "description": GeneratorKind::describe(name),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Generators:");
                for name in names {
                    let desc = GeneratorKind::describe(name).unwrap_or_default();
                    println!("  {name:<14} {desc}");
                }
            }
        }
        Command::Schema { generator } => {
            let schema = GeneratorKind::schema_for(&generator)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Render {
            generator,
            params,
            seed,
            runs,
            output_dir,
            output,
            history,
            no_history,
        } => {
            let args = RenderArgs {
                generator,
                params,
                seed,
                runs,
                output_dir,
                output,
                history: (!no_history).then_some(history),
            };
            render(args, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
