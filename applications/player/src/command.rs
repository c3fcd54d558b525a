//! Line commands
//!
//! One command per stdin line, e.g. `play 4`, `playlist 5 2 9`, `seek 50`.

use crate::error::{PlayerError, Result};
use cadence_core::TrackId;
use cadence_playback::{PlaybackError, PlaybackHandle, PlaybackSnapshot, RepeatMode};
use std::str::FromStr;

pub const HELP: &str = "\
commands:
  play <id>              play a catalog track
  playlist <id> <id>...  play an ordered list of tracks
  toggle                 play/pause
  next | prev            step through the active playlist
  volume <0-100>         set volume
  seek <percent>         seek within the current track
  repeat none|all|one    set repeat mode
  shuffle on|off         set shuffle
  mute                   toggle mute
  status                 show playback state
  help                   show this text
  quit                   exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(TrackId),
    Playlist(Vec<TrackId>),
    Toggle,
    Next,
    Previous,
    Volume(u8),
    Seek(f64),
    Repeat(RepeatMode),
    Shuffle(bool),
    Mute,
    Status,
    Help,
    Quit,
}

/// What the host loop should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue,
    Print(String),
    Quit,
}

impl FromStr for Command {
    type Err = PlayerError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(PlayerError::Command("empty line".to_string()));
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("play", [id]) => Command::Play(TrackId::from(*id)),
            ("playlist", ids) if !ids.is_empty() => {
                Command::Playlist(ids.iter().map(|id| TrackId::from(*id)).collect())
            }
            ("toggle", []) => Command::Toggle,
            ("next", []) => Command::Next,
            ("prev" | "previous", []) => Command::Previous,
            ("volume", [level]) => Command::Volume(parse_arg(level, "volume")?),
            ("seek", [percent]) => Command::Seek(parse_arg(percent, "seek")?),
            ("repeat", [mode]) => Command::Repeat(parse_repeat(mode)?),
            ("shuffle", [flag]) => Command::Shuffle(parse_flag(flag)?),
            ("mute", []) => Command::Mute,
            ("status", []) => Command::Status,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => {
                return Err(PlayerError::Command(format!(
                    "unrecognized: {} (try `help`)",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| PlayerError::Command(format!("{what}: cannot parse {raw:?}")))
}

fn parse_repeat(raw: &str) -> Result<RepeatMode> {
    match raw.to_ascii_lowercase().as_str() {
        "none" | "off" => Ok(RepeatMode::Off),
        "all" => Ok(RepeatMode::All),
        "one" => Ok(RepeatMode::One),
        other => Err(PlayerError::Command(format!("repeat: unknown mode {other:?}"))),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(PlayerError::Command(format!("expected on/off, got {other:?}"))),
    }
}

/// Run a command against the playback handle
///
/// Refused track starts are not errors here: the coordinator already queued
/// a notice for them.
pub async fn dispatch(handle: &PlaybackHandle, command: Command) -> Result<Outcome> {
    let started = match command {
        Command::Play(id) => handle.play_track(&id).await,
        Command::Playlist(ids) => handle.play_playlist(&ids).await,
        Command::Toggle => {
            handle.toggle_play();
            Ok(())
        }
        Command::Next => {
            if !handle.next_song().await {
                return Ok(Outcome::Print("no next track".to_string()));
            }
            Ok(())
        }
        Command::Previous => {
            if !handle.previous_song().await {
                return Ok(Outcome::Print("no previous track".to_string()));
            }
            Ok(())
        }
        Command::Volume(level) => {
            handle.set_volume(level);
            Ok(())
        }
        Command::Seek(percent) => {
            handle.handle_progress_change(percent);
            Ok(())
        }
        Command::Repeat(mode) => {
            handle.set_repeat_mode(mode);
            Ok(())
        }
        Command::Shuffle(enabled) => {
            handle.set_shuffle_enabled(enabled);
            Ok(())
        }
        Command::Mute => {
            handle.toggle_mute();
            Ok(())
        }
        Command::Status => return Ok(Outcome::Print(render_status(&handle.snapshot()))),
        Command::Help => return Ok(Outcome::Print(HELP.to_string())),
        Command::Quit => return Ok(Outcome::Quit),
    };

    match started {
        Ok(()) | Err(PlaybackError::EntitlementDenied(_)) => Ok(Outcome::Continue),
        Err(e) => Err(e.into()),
    }
}

/// One-line summary of a snapshot
pub fn render_status(snapshot: &PlaybackSnapshot) -> String {
    let transport = if snapshot.is_playing { "playing" } else { "paused" };
    let playlist = snapshot
        .active_playlist
        .as_ref()
        .map_or_else(|| "none".to_string(), |ids| format!("{} tracks", ids.len()));

    format!(
        "{transport} #{id} [{engine:?}] {progress:.0}% of {duration:.0}s | vol {volume}{muted} | repeat {repeat:?} | shuffle {shuffle} | playlist {playlist}",
        id = snapshot.current_track_id,
        engine = snapshot.engine_state,
        progress = snapshot.progress_percent,
        duration = snapshot.duration_seconds,
        volume = snapshot.volume,
        muted = if snapshot.is_muted { " (muted)" } else { "" },
        repeat = snapshot.repeat_mode,
        shuffle = if snapshot.shuffle_enabled { "on" } else { "off" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            "play 4".parse::<Command>().unwrap(),
            Command::Play(TrackId::from("4"))
        );
        assert_eq!(
            "playlist 5 2 9".parse::<Command>().unwrap(),
            Command::Playlist(vec![
                TrackId::from("5"),
                TrackId::from("2"),
                TrackId::from("9")
            ])
        );
        assert_eq!("  NEXT ".parse::<Command>().unwrap(), Command::Next);
        assert_eq!("volume 30".parse::<Command>().unwrap(), Command::Volume(30));
        assert_eq!("seek 12.5".parse::<Command>().unwrap(), Command::Seek(12.5));
        assert_eq!(
            "repeat one".parse::<Command>().unwrap(),
            Command::Repeat(RepeatMode::One)
        );
        assert_eq!(
            "shuffle on".parse::<Command>().unwrap(),
            Command::Shuffle(true)
        );
    }

    #[test]
    fn rejects_bad_input() {
        let lines = [
            "",
            "play",
            "playlist",
            "volume loud",
            "volume 300",
            "repeat twice",
            "dance",
        ];
        for line in lines {
            assert!(
                matches!(line.parse::<Command>(), Err(PlayerError::Command(_))),
                "{line:?} should not parse"
            );
        }
    }
}
