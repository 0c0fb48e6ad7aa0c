//! Output file stems.

use art_forge_core::Generator;
use chrono::{DateTime, Local, TimeZone};

/// File stem for one render: the generator's custom stem when it has one,
/// otherwise its prefix followed by the wall-clock time as `HHMMSS`.
pub fn output_stem<Tz: TimeZone>(gen: &dyn Generator, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match gen.custom_stem() {
        Some(stem) => stem.to_string(),
        None => format!("{}{}", gen.file_prefix(), now.format("%H%M%S")),
    }
}

/// [`output_stem`] at the current local time.
pub fn output_stem_now(gen: &dyn Generator) -> String {
    output_stem(gen, &Local::now())
}

/// Appends `_<run>` when a batch renders more than one image, so runs
/// within the same second do not overwrite each other.
pub fn batch_stem(stem: &str, run: u32, runs: u32) -> String {
    if runs > 1 {
        format!("{stem}_{run}")
    } else {
        stem.to_string()
    }
}
