use std::{env, process};

use anyhow::Context;
use log::info;

use receptive_field::{DEFAULT_INPUT_SIZE, configs};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("{}", usage(&args));
        process::exit(1);
    }

    if let Err(e) = run(
        &args[1],
        args.get(2).map(String::as_str),
        args.get(3).map(String::as_str),
    ) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn usage(args: &[String]) -> String {
    let bin = args.first().map_or("rf-calc", String::as_str);
    format!("Usage: {bin} <layers.json> [input_size] [output.md]")
}

fn run(layers_path: &str, input_size: Option<&str>, output: Option<&str>) -> anyhow::Result<()> {
    let file = configs::load_layers(layers_path)?;

    // command line > layer file > default
    let input_size = match input_size {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid input size '{arg}'"))?,
        None => file.input_size.unwrap_or(DEFAULT_INPUT_SIZE),
    };

    let mut calculator = file.into_calculator()?;
    info!(
        "propagating input size {input_size} through {} layer(s)",
        calculator.layers().len()
    );
    calculator.calculate(input_size)?;

    match output {
        Some(path) => calculator
            .to_markdown(path)
            .with_context(|| format!("exporting to '{path}'"))?,
        None => calculator.show_layers()?,
    }

    Ok(())
}
