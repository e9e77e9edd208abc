use anyhow::{Result, bail};
use clap::Parser;
use log::{debug, info};
use smf_writer::{
    Args, WriterOptions, describe, export_midi_file, load_song_file, output_path, parse_preset,
};

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut demo_name = None;
    let midi = if let Some(path) = &args.song {
        info!("Loading song: '{}'...", path.display());
        let mut song = load_song_file(path)?;
        song.options.program_changes |= args.program_changes;
        song.to_writer()?
    } else if let Some(demo) = &args.demo {
        let Some(preset) = parse_preset(demo) else {
            bail!("Unknown demo '{}'..!", demo);
        };

        info!("Rendering demo '{}': {}...", preset.name, preset.description);
        demo_name = Some(preset.name);
        preset.render(WriterOptions {
            ticks_per_quarter: args.ticks_per_quarter,
            program_changes: args.program_changes,
        })?
    } else {
        bail!("Nothing to write, pass a song file or `--demo <name>`..!");
    };

    debug!("Writer options: {:?}", midi.options());

    if args.dry_run || args.verbose {
        for line in describe(&midi) {
            info!("{}", line);
        }
    }
    if args.dry_run {
        let bytes = midi.finalize()?;
        info!("Dry run: {} bytes would be written..!", bytes.len());
        return Ok(());
    }

    let output = output_path(args.output.as_deref(), args.song.as_deref(), demo_name);
    export_midi_file(&output, &midi)?;

    Ok(())
}
