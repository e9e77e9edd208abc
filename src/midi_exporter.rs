use crate::model::song::Song;
use crate::writer::MidiWriter;
use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Finalize `writer` and write the bytes to `path`, creating missing parent directories.
///
/// Returns the number of bytes written.
pub fn export_midi_file<P: AsRef<Path>>(path: P, writer: &MidiWriter) -> Result<usize> {
    let path = path.as_ref();
    let bytes = writer
        .finalize()
        .map_err(|e| anyhow!("Failed to encode MIDI for {}: {}", path.display(), e))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        debug!("Creating output directory {}", parent.display());
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, &bytes)
        .with_context(|| format!("Failed to write MIDI file {}", path.display()))?;

    info!(
        "Wrote {} bytes ({} tracks) to '{}'..!",
        bytes.len(),
        writer.track_count(),
        path.display()
    );
    Ok(bytes.len())
}

/// Read and parse a JSON song description. Values are range-checked by [`Song::to_writer`].
pub fn load_song_file<P: AsRef<Path>>(path: P) -> Result<Song> {
    let json = fs::read_to_string(path.as_ref()).map_err(|e| {
        anyhow!(
            "Failed to read song file {}: {}",
            path.as_ref().display(),
            e
        )
    })?;

    let song: Song = serde_json::from_str(&json)
        .map_err(|e| anyhow!("Failed to parse song {}: {}", path.as_ref().display(), e))?;

    debug!(
        "Song has {} channel assignment(s), {} tempo change(s), {} note(s)",
        song.channels.len(),
        song.tempos.len(),
        song.notes.len()
    );

    Ok(song)
}
