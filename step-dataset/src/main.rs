use std::io::{self, BufWriter, Write};
use step_dataset::{ExpressionGenerator, GeneratorOptionsBuilder, Processor};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: step-dataset <num_samples> [seed]";

/// Parses the command line arguments into the number of samples and an optional seed.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(usize, Option<u64>), String> {
    let num_samples = args.next()
        .ok_or_else(|| USAGE.to_string())?
        .parse()
        .map_err(|err| format!("invalid number of samples: {}", err))?;
    let seed = args.next()
        .map(|seed| seed.parse().map_err(|err| format!("invalid seed: {}", err)))
        .transpose()?;
    Ok((num_samples, seed))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args();
    args.next();
    let (num_samples, seed) = parse_args(args)?;

    let mut builder = GeneratorOptionsBuilder::new();
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }

    let mut generator = ExpressionGenerator::new(builder.build())?;
    let expressions = generator.generate_dataset(num_samples);
    tracing::info!(generated = expressions.len(), num_samples, "generated expressions");

    let samples = Processor::default().process_dataset(&expressions[..]);

    let mut out = BufWriter::new(io::stdout().lock());
    for sample in &samples {
        serde_json::to_writer(&mut out, sample)?;
        writeln!(out)?;
    }
    out.flush()?;

    tracing::info!(samples = samples.len(), "wrote dataset");
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn samples_and_seed() {
        assert_eq!(parse_args(args(&["10", "3"])), Ok((10, Some(3))));
        assert_eq!(parse_args(args(&["10"])), Ok((10, None)));
    }

    #[test]
    fn bad_args() {
        assert_eq!(parse_args(args(&[])), Err(USAGE.to_string()));
        assert!(parse_args(args(&["ten"])).is_err());
        assert!(parse_args(args(&["10", "x"])).is_err());
    }
}
