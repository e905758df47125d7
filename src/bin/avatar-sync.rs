use std::path::{Path, PathBuf};

use anyhow::Context as _;
use avatar_sync::foundation::core::ElementId;
use avatar_sync::record::CodecSupport;
use avatar_sync::registry::DEFAULT_MODEL;
use avatar_sync::{
    AnimationSet, AvatarConfig, AvatarSession, CallLogRenderer, FfmpegCodecProbe,
    InMemoryMediaBackend, ModelCatalog, RendererCall, ScriptedSynthesizer, SimulatedAudio,
    SynthesisRequest, Timeline, TrackKind, VisemeEvent, negotiate_format,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "avatar-sync", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a timeline against simulated audio and print the renderer calls.
    Simulate(SimulateArgs),
    /// Print the recording format the local ffmpeg build would negotiate.
    Negotiate(NegotiateArgs),
    /// List the enabled actions and emotions of a model.
    Registry(RegistryArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Timeline JSON as exported by the editor.
    #[arg(long)]
    timeline: Option<PathBuf>,

    /// JSON array of `{ "visemeId", "timestampMs" }` events.
    #[arg(long)]
    visemes: Option<PathBuf>,

    /// Length of the synthesized clip in seconds.
    #[arg(long, default_value_t = 5.0)]
    duration: f64,

    /// Text to speak.
    #[arg(long, default_value = "你好")]
    text: String,

    /// Record the pass and report the download artifact.
    #[arg(long)]
    record: bool,

    /// Codec set offered by the simulated recorder.
    #[arg(long, value_enum, default_value_t = Platform::Webm)]
    platform: Platform,

    /// Directory to write the recorded video into.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    model: ModelArgs,

    /// Config JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct NegotiateArgs {
    /// Also print every probed candidate.
    #[arg(long)]
    all: bool,
}

#[derive(Parser, Debug)]
struct RegistryArgs {
    #[command(flatten)]
    model: ModelArgs,
}

#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// Model catalog JSON (defaults to the built-in set).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Model name; unknown models use the default set.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Platform {
    /// H.264/AAC in MP4.
    Mp4,
    /// VP9 or H.264 with Opus in WebM.
    Webm,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Negotiate(args) => cmd_negotiate(args),
        Command::Registry(args) => cmd_registry(args),
    }
}

fn load_registry(args: &ModelArgs) -> anyhow::Result<AnimationSet> {
    let catalog = match &args.catalog {
        Some(path) => ModelCatalog::from_json_file(path)?,
        None => ModelCatalog::default(),
    };
    catalog
        .for_model(&args.model)
        .cloned()
        .with_context(|| format!("model '{}' has no animation set and no default", args.model))
}

fn read_json_file(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn describe(call: &RendererCall) -> String {
    match call {
        RendererCall::PlayAnimation(name) => format!("play_animation({name:?})"),
        RendererCall::UpdateEmotion(name) => format!("update_emotion({name:?})"),
        RendererCall::UpdateViseme(id) => format!("update_viseme({id})"),
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => AvatarConfig::from_json_file(path)?,
        None => AvatarConfig::default(),
    };
    let registry = load_registry(&args.model)?;
    let backend = match args.platform {
        Platform::Mp4 => InMemoryMediaBackend::mp4(),
        Platform::Webm => InMemoryMediaBackend::webm_only(),
    };
    let mut session = AvatarSession::new(cfg, registry, backend)?;

    if let Some(path) = &args.timeline {
        let json = read_json_file(path, "timeline")?;
        let timeline = Timeline::from_json(&json, session.registry())
            .with_context(|| format!("load timeline '{}'", path.display()))?;
        session.set_timeline(timeline)?;
    }
    let visemes: Vec<VisemeEvent> = match &args.visemes {
        Some(path) => serde_json::from_str(&read_json_file(path, "visemes")?)
            .with_context(|| "parse viseme JSON")?,
        None => Vec::new(),
    };

    let mut synth = ScriptedSynthesizer::new(args.duration, visemes);
    let mut audio = SimulatedAudio::new(ElementId(1));
    let mut renderer = CallLogRenderer::new();

    let request = SynthesisRequest::new(args.text);
    session.animate(&request, &mut synth, &mut audio, &mut renderer)?;
    if args.record {
        // The recording replays the pass from the top; only that pass is reported.
        renderer.take_calls();
        let format = session.record(&mut audio, &mut renderer)?;
        println!("recording: {} (.{})", format.mime_type, format.extension);
    }
    session.run_to_end(&mut audio, &mut renderer)?;

    for call in renderer.logged() {
        println!("{:>8.3}s  {}", call.at_secs, describe(&call.call));
    }

    if args.record {
        let artifact = session.recording().download()?;
        println!(
            "download: {} ({}, {} bytes)",
            artifact.filename,
            artifact.mime_type,
            artifact.bytes.len()
        );
        if let Some(dir) = &args.out {
            let path = artifact.save_into(dir)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn cmd_negotiate(args: NegotiateArgs) -> anyhow::Result<()> {
    let probe = FfmpegCodecProbe::probe_or_empty();
    if args.all {
        for candidate in avatar_sync::record::CODEC_PREFERENCE {
            let mark = if probe.is_type_supported(candidate.mime_type) {
                "yes"
            } else {
                "no"
            };
            println!("{mark:>3}  {}", candidate.mime_type);
        }
    }
    let format = negotiate_format(&probe);
    println!("{} (.{})", format.mime_type, format.extension);
    Ok(())
}

fn cmd_registry(args: RegistryArgs) -> anyhow::Result<()> {
    let registry = load_registry(&args.model)?;
    for track in TrackKind::ALL {
        println!("{track}:");
        for name in registry.enabled_names(track) {
            println!("  {name:<12} {}", registry.display_name(track, name));
        }
    }
    Ok(())
}
