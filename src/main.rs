use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cuesplit::artwork::find_front_cover;
use cuesplit::config::{build_id, SplitConfig};
use cuesplit::cue::parse_cue;
use cuesplit::encoder::Codec;
use cuesplit::error::CueSplitError;
use cuesplit::pair::resolve_pair;
use cuesplit::pipeline::split_and_encode;
use cuesplit::report::ExtractionReport;
use cuesplit::text::read_cue_lines;

struct CliArgs {
    filename: PathBuf,
    codec: Option<Codec>,
    opts: Option<String>,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [-m flac|mp3|opus|vorbis] [-o OPTS] <filename>");
    eprintln!("  -m, --media    encode the split tracks with the given codec");
    eprintln!("  -o, --opts     raw options handed to the encoder");
    eprintln!("  -V, --version  print the version and exit");
    process::exit(1);
}

fn parse_args() -> CliArgs {
    let program = env::args().next().unwrap_or_else(|| "cuesplit".to_string());
    let mut filename = None;
    let mut codec = None;
    let mut opts = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-V" | "--version" => {
                println!("{}", build_id());
                process::exit(0);
            }
            "-m" | "--media" => {
                let name = args.next().unwrap_or_else(|| usage(&program));
                codec = Codec::from_name(&name);
                if codec.is_none() {
                    usage(&program);
                }
            }
            "-o" | "--opts" => {
                opts = Some(args.next().unwrap_or_else(|| usage(&program)));
            }
            _ if filename.is_none() => filename = Some(PathBuf::from(arg)),
            _ => usage(&program),
        }
    }

    match filename {
        Some(filename) => CliArgs {
            filename,
            codec,
            opts,
        },
        None => usage(&program),
    }
}

async fn run(args: CliArgs) -> Result<(), CueSplitError> {
    let pair = resolve_pair(&args.filename)?;

    let mut metadata = None;
    if pair.is_complete() {
        if let Some(cue) = &pair.cue {
            match read_cue_lines(cue).await? {
                Some(lines) => {
                    let mut meta = parse_cue(&lines);
                    meta.cover_front = cue.parent().and_then(find_front_cover);
                    metadata = Some(meta);
                }
                None => warn!("cue is not readable or has bad encoding, no metadata available"),
            }
        }
    }

    let report = ExtractionReport::new(&pair, metadata.as_ref());
    println!("{}", report.to_json().map_err(io::Error::other)?);

    if let (Some(codec), Some(meta)) = (args.codec, metadata.as_ref()) {
        if meta.tracks.is_empty() {
            warn!("the cue sheet has no tracks, nothing to encode");
        } else {
            let produced =
                split_and_encode(&pair, meta, codec, args.opts.as_deref(), &SplitConfig::default())
                    .await?;
            info!("encoded {} track(s)", produced.len());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();
    if let Err(error) = run(args).await {
        eprintln!("{error}");
        process::exit(1);
    }
}
