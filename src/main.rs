//! WAV front door for the analysis pipeline: decode, downmix, analyze, report.

use std::path::{Path, PathBuf};

use sonalyze::analysis::{AnalysisConfig, analyze};
use sonalyze::{logging, report};

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let (samples, sample_rate) = load_wav_mono(&options.input)?;
    tracing::info!(
        path = %options.input.display(),
        samples = samples.len(),
        sample_rate,
        "decoded input"
    );
    let bundle = analyze(&samples, sample_rate, &options.config)
        .map_err(|err| format!("Analysis failed: {err}"))?;
    if options.json {
        let json = serde_json::to_string_pretty(&bundle)
            .map_err(|err| format!("JSON encoding failed: {err}"))?;
        println!("{json}");
    } else {
        print!("{}", report::render(&bundle));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Options {
    input: PathBuf,
    json: bool,
    config: AnalysisConfig,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut input: Option<PathBuf> = None;
    let mut json = false;
    let mut config = AnalysisConfig::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--json" => json = true,
            "--frame-size" => {
                idx += 1;
                config.frame_size = parse_usize(&args, idx, "--frame-size")?;
            }
            "--hop-size" => {
                idx += 1;
                config.hop_size = parse_usize(&args, idx, "--hop-size")?;
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown flag {other}; see --help"));
            }
            path => {
                if input.replace(PathBuf::from(path)).is_some() {
                    return Err("Expected exactly one input file".to_string());
                }
            }
        }
        idx += 1;
    }

    let Some(input) = input else {
        return Err("Missing input file; see --help".to_string());
    };
    Ok(Some(Options {
        input,
        json,
        config,
    }))
}

fn parse_usize(args: &[String], idx: usize, flag: &str) -> Result<usize, String> {
    args.get(idx)
        .ok_or_else(|| format!("{flag} expects a value"))?
        .parse::<usize>()
        .map_err(|err| format!("{flag} expects an integer: {err}"))
}

fn help_text() -> String {
    [
        "Usage: sonalyze [options] <input.wav>",
        "",
        "Options:",
        "  --json             Emit the feature bundle as JSON",
        "  --frame-size <n>   Analysis frame size in samples (default 2048)",
        "  --hop-size <n>     Hop between frames in samples (default 512)",
        "  -h, --help         Show this help",
    ]
    .join("\n")
}

/// Decode a WAV file to mono f32 samples plus its sample rate.
///
/// Integer formats are scaled to [-1, 1]; multi-channel input is downmixed
/// by averaging interleaved channels.
fn load_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| format!("Failed to open {}: {err}", path.display()))?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| format!("Failed to decode {}: {err}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|err| format!("Failed to decode {}: {err}", path.display()))?
        }
    };
    Ok((
        downmix_to_mono(&interleaved, spec.channels),
        spec.sample_rate,
    ))
}

fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.to_vec();
    }
    let frames = samples.len() / channels;
    let mut out = Vec::with_capacity(frames);
    for frame in 0..frames {
        let start = frame * channels;
        let sum: f32 = samples[start..start + channels].iter().sum();
        out.push(sum / channels as f32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_channels() {
        let stereo = vec![1.0_f32, -1.0, 0.5, 0.25];
        let mono = downmix_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.0).abs() < 1e-6);
        assert!((mono[1] - 0.375).abs() < 1e-6);
    }

    #[test]
    fn parse_args_reads_flags_and_input() {
        let options = parse_args(vec![
            "--json".to_string(),
            "--frame-size".to_string(),
            "1024".to_string(),
            "clip.wav".to_string(),
        ])
        .unwrap()
        .unwrap();
        assert!(options.json);
        assert_eq!(options.config.frame_size, 1024);
        assert_eq!(options.input, PathBuf::from("clip.wav"));
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(parse_args(vec!["--json".to_string()]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse_args(vec!["--bogus".to_string()]).is_err());
    }
}
