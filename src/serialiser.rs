use crate::cue::Cue;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Writes cues as SubRip. Cues without an id are numbered by position.
pub fn serialise<W: Write>(cues: &[Cue], output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    write_cues(&mut writer, cues).context("Failed to write cues.")?;
    writer.flush().context("Failed to write cues.")?;
    Ok(())
}

fn write_cues<W: Write>(buf: &mut W, cues: &[Cue]) -> Result<()> {
    for (index, cue) in cues.iter().enumerate() {
        write_cue(buf, index + 1, cue)?;
    }
    Ok(())
}

fn write_cue<W: Write>(buf: &mut W, position: usize, cue: &Cue) -> Result<()> {
    if cue.id().is_empty() {
        writeln!(buf, "{}", position)?;
    } else {
        writeln!(buf, "{}", cue.id())?;
    }
    write_ts(buf, cue.start_time())?;
    write!(buf, " --> ")?;
    write_ts(buf, cue.end_time())?;
    writeln!(buf)?;
    if !cue.text().is_empty() {
        writeln!(buf, "{}", cue.text())?;
    }
    writeln!(buf)?;
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, seconds: f64) -> Result<()> {
    let total_millis = (seconds * 1000.0).round() as u64;
    let total_secs = total_millis / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = total_millis % 1000;
    write!(
        buf,
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, seconds, millis
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    macro_rules! test_write_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let mut buf = Cursor::new(vec![]);

                write_ts(&mut buf, input).expect("Failed to write to buffer");

                assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), expected);
            }
        )*
        }
    }

    test_write_ts! {
        test_write_ts_0: (0.0, "00:00:00,000"),
        test_write_ts_1: (0.001, "00:00:00,001"),
        test_write_ts_2: (0.999, "00:00:00,999"),
        test_write_ts_3: (1.0, "00:00:01,000"),
        test_write_ts_4: (2.5, "00:00:02,500"),
        test_write_ts_5: (59.999, "00:00:59,999"),
        test_write_ts_6: (60.0, "00:01:00,000"),
        test_write_ts_7: (3600.0, "01:00:00,000"),
        test_write_ts_8: (7326.159, "02:02:06,159"),
        test_write_ts_9: (360_000.001, "100:00:00,001"),
    }

    #[test]
    fn test_serialise_numbers_anonymous_cues() {
        let cues = vec![
            Cue::new("intro", 1.0, 2.0, "Hello\nworld").unwrap(),
            Cue::new("", 3.0, 4.0, "Bye").unwrap(),
        ];
        let mut out = Vec::new();
        serialise(&cues, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "intro\n00:00:01,000 --> 00:00:02,000\nHello\nworld\n\n\
             2\n00:00:03,000 --> 00:00:04,000\nBye\n\n"
        );
    }
}
