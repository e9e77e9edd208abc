//! General MIDI lookup tables for [`MidiWriter::set_channel`](crate::MidiWriter::set_channel)
//! programs and channel 10 percussion keys.

/// Zero-based channel that General MIDI reserves for percussion (channel 10 on hardware).
pub const DRUM_CHANNEL: u8 = 9;

/// General MIDI level 1 program names, indexed by program number.
pub const PROGRAM_NAMES: [&str; 128] = [
    // 0
    "acoustic_grand_piano",
    "bright_acoustic_piano",
    "electric_grand_piano",
    "honky_tonk_piano",
    "rhodes_piano",
    "chorused_piano",
    "harpsichord",
    "clavinet",
    // 8
    "celesta",
    "glockenspiel",
    "music_box",
    "vibraphone",
    "marimba",
    "xylophone",
    "tubular_bells",
    "dulcimer",
    // 16
    "hammond_organ",
    "percussive_organ",
    "rock_organ",
    "church_organ",
    "reed_organ",
    "accordion",
    "harmonica",
    "tango_accordion",
    // 24
    "acoustic_guitar_nylon",
    "acoustic_guitar_steel",
    "electric_guitar_jazz",
    "electric_guitar_clean",
    "electric_guitar_muted",
    "overdriven_guitar",
    "distortion_guitar",
    "guitar_harmonics",
    // 32
    "acoustic_bass",
    "electric_bass_finger",
    "electric_bass_pick",
    "fretless_bass",
    "slap_bass_1",
    "slap_bass_2",
    "synth_bass_1",
    "synth_bass_2",
    // 40
    "violin",
    "viola",
    "cello",
    "contrabass",
    "tremolo_strings",
    "pizzicato_strings",
    "orchestral_harp",
    "timpani",
    // 48
    "string_ensemble_1",
    "string_ensemble_2",
    "synth_strings_1",
    "synth_strings_2",
    "choir_aahs",
    "voice_oohs",
    "synth_voice",
    "orchestra_hit",
    // 56
    "trumpet",
    "trombone",
    "tuba",
    "muted_trumpet",
    "french_horn",
    "brass_section",
    "synth_brass_1",
    "synth_brass_2",
    // 64
    "soprano_sax",
    "alto_sax",
    "tenor_sax",
    "baritone_sax",
    "oboe",
    "english_horn",
    "bassoon",
    "clarinet",
    // 72
    "piccolo",
    "flute",
    "recorder",
    "pan_flute",
    "bottle_blow",
    "shakuhachi",
    "whistle",
    "ocarina",
    // 80
    "lead_1_square",
    "lead_2_sawtooth",
    "lead_3_calliope_lead",
    "lead_4_chiffer_lead",
    "lead_5_charang",
    "lead_6_voice",
    "lead_7_fifths",
    "lead_8_brass_and_lead",
    // 88
    "pad_1_new_age",
    "pad_2_warm",
    "pad_3_polysynth",
    "pad_4_choir",
    "pad_5_bowed",
    "pad_6_metallic",
    "pad_7_halo",
    "pad_8_sweep",
    // 96
    "fx_1_rain",
    "fx_2_soundtrack",
    "fx_3_crystal",
    "fx_4_atmosphere",
    "fx_5_brightness",
    "fx_6_goblins",
    "fx_7_echoes",
    "fx_8_sci_fi",
    // 104
    "sitar",
    "banjo",
    "shamisen",
    "koto",
    "kalimba",
    "bagpipe",
    "fiddle",
    "shanai",
    // 112
    "tinkle_bell",
    "agogo",
    "steel_drums",
    "woodblock",
    "taiko_drum",
    "melodic_tom",
    "synth_drum",
    "cymbal_reverse",
    // 120
    "guitar_fret_noise",
    "breath_noise",
    "seashore",
    "bird_tweet",
    "telephone_ring",
    "helicopter",
    "applause",
    "gunshot",
];

/// Percussion key numbers on [`DRUM_CHANNEL`]. Several keys have more than one name.
pub const DRUM_MAPPINGS: &[(&str, u8)] = &[
    ("laser", 27),
    ("whip", 28),
    ("scratch_push", 29),
    ("scratch_pull", 30),
    ("sticks", 31),
    ("metronome_click", 32),
    ("metronome_bell", 33),
    ("bass_drum", 34),
    ("kick_drum", 35),
    ("bass_drum_1", 36),
    ("snare_cross_stick", 37),
    ("snare_drum_rim", 37),
    ("snare_drum", 38),
    ("snare_drum_1", 38),
    ("hand_clap", 39),
    ("snare_drum_2", 40),
    ("tom1", 41),
    ("tom_1", 41),
    ("cymbal_hi_hat_closed", 42),
    ("cymbal_hihat_closed", 42),
    ("tom2", 43),
    ("tom_2", 43),
    ("cymbal_hi_hat_pedal", 44),
    ("tom3", 45),
    ("tom_3", 45),
    ("cymbal_hi_hat_open", 46),
    ("cymbal_hihat_open", 46),
    ("tom4", 47),
    ("tom_4", 47),
    ("tom_5", 48),
    ("cymbal_crash1", 49),
    ("cymbal_crash_1", 49),
    ("tom5", 50),
    ("tom_6", 50),
    ("cymbal_ride", 51),
    ("cymbal_ride_1", 51),
    ("cymbal_china", 52),
    ("cymbal_ride_bell", 53),
    ("tambourine", 54),
    ("cymbal_splash", 55),
    ("cowbell", 56),
    ("cymbal_crash2", 57),
    ("cymbal_crash_2", 57),
    ("vibraslap", 58),
    ("cymbal_ride_2", 59),
    ("high_bongo", 60),
    ("low_bongo", 61),
    ("conga_dead_stroke", 62),
    ("conga", 63),
    ("high_timbale", 64),
    ("low_timbale", 65),
    ("high_agogo", 66),
    ("low_agogo", 67),
    ("cabasa", 68),
    ("maracas", 69),
    ("whistle_short", 70),
    ("whistle_long", 71),
    ("guiro_short", 72),
    ("guiro_long", 73),
    ("claves", 74),
    ("high_woodblock", 75),
    ("low_woodblock", 76),
    ("cuica_high", 77),
    ("cuica_low", 78),
    ("triangle_mute", 79),
    ("triangle_open", 80),
    ("shaker", 81),
    ("sleigh_bell", 82),
    ("bell_tree", 83),
    ("castanets", 84),
    ("surdu_dead_stroke", 85),
    ("surdu", 86),
    ("snare_drum_rod", 87),
    ("ocean_drum", 88),
    ("snare_drum_brush", 89),
];

/// Lowercase, and fold spaces, dashes and parentheses so `"Acoustic Guitar (Nylon)"`
/// matches `acoustic_guitar_nylon`.
fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['(', ')'], "")
        .replace([' ', '-'], "_")
        .replace("_+_", "_and_")
}

pub fn program_for_name(name: &str) -> Option<u8> {
    let name = normalize(name);
    PROGRAM_NAMES
        .iter()
        .position(|p| *p == name)
        .map(|p| p as u8)
}

pub fn program_name(program: u8) -> Option<&'static str> {
    PROGRAM_NAMES.get(program as usize).copied()
}

pub fn drum_for_name(name: &str) -> Option<u8> {
    let name = normalize(name);
    DRUM_MAPPINGS
        .iter()
        .find(|(drum, _)| *drum == name)
        .map(|(_, key)| *key)
}
