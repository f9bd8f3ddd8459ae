use quick_xml::{events::Event, Reader};
use std::str::FromStr;

/// One subtitle line from a timedtext track.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

fn get_attr<T>(e: &quick_xml::events::BytesStart, attr: &str) -> Option<T>
where
    T: FromStr,
{
    e.try_get_attribute(attr)
        .ok()?
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse().ok())
}

/// Parses a YouTube timedtext document into its cues.
///
/// The format is a flat `<transcript>` of `<text start=".." dur="..">`
/// elements; cues without a duration get zero length.
pub fn parse_timedtext(xml: &str) -> Result<Vec<Cue>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut cues = Vec::new();
    let mut current: Option<Cue> = None;

    loop {
        match reader.read_event() {
            Err(e) => return Err(e),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"text" {
                    current = Some(Cue {
                        start: get_attr(&e, "start").ok_or(quick_xml::Error::TextNotFound)?,
                        duration: get_attr(&e, "dur").unwrap_or(0.0),
                        text: String::new(),
                    });
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(cue) = current.as_mut() {
                    cue.text = e.unescape().map(|t| t.into_owned()).unwrap_or_default();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"text" {
                    if let Some(cue) = current.take() {
                        cues.push(cue);
                    }
                }
            }
            _ => (),
        }
    }

    Ok(cues)
}

fn format_timestamp(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Renders cues as numbered SRT blocks.
pub fn to_srt(cues: &[Cue]) -> String {
    let mut out = String::new();

    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(cue.start),
            format_timestamp(cue.start + cue.duration),
            cue.text
        ));
    }

    out
}
