//! Background tracks and the cursor that walks them.

use super::ToneCommand;

/// Gap inserted after every note.
const NOTE_GAP_MS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// Frequency in Hz; 0 is a rest.
    pub freq: u16,
    pub dur_ms: u16,
}

const fn n(freq: u16, dur_ms: u16) -> Note {
    Note { freq, dur_ms }
}

const INTRO: &[Note] = &[
    n(523, 100),
    n(659, 100),
    n(784, 100),
    n(1047, 200),
    n(0, 50),
    n(784, 100),
    n(1047, 300),
];

const MENU: &[Note] = &[
    n(392, 150),
    n(392, 150),
    n(392, 150),
    n(262, 600),
    n(392, 600),
    n(349, 150),
    n(330, 150),
    n(294, 150),
    n(523, 600),
    n(392, 300),
    n(349, 150),
    n(330, 150),
    n(294, 150),
    n(523, 600),
    n(392, 300),
    n(349, 150),
    n(330, 150),
    n(349, 150),
    n(294, 600),
    n(0, 200),
];

const BOSS: &[Note] = &[n(150, 250), n(200, 250), n(150, 250), n(250, 400)];

const GAME_OVER: &[Note] = &[
    n(349, 400),
    n(349, 200),
    n(349, 200),
    n(349, 400),
    n(415, 600),
    n(349, 400),
    n(349, 200),
    n(349, 200),
    n(349, 400),
    n(415, 600),
    n(392, 400),
    n(349, 200),
];

const VICTORY: &[Note] = &[
    n(784, 100),
    n(988, 100),
    n(1175, 100),
    n(1568, 300),
    n(0, 50),
    n(1175, 100),
    n(1568, 400),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Intro,
    Menu,
    Boss,
    GameOver,
    Victory,
}

impl Track {
    pub const fn notes(self) -> &'static [Note] {
        match self {
            Self::Intro => INTRO,
            Self::Menu => MENU,
            Self::Boss => BOSS,
            Self::GameOver => GAME_OVER,
            Self::Victory => VICTORY,
        }
    }

    /// Menu and boss themes repeat; the rest play once.
    pub const fn looping(self) -> bool {
        matches!(self, Self::Menu | Self::Boss)
    }
}

/// Playback position inside the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MelodyCursor {
    track: Option<Track>,
    index: usize,
    /// When the next note is due; `None` means on the next advance.
    next_at_ms: Option<u64>,
    note_off_at_ms: Option<u64>,
}

impl MelodyCursor {
    pub const fn new() -> Self {
        Self {
            track: None,
            index: 0,
            next_at_ms: None,
            note_off_at_ms: None,
        }
    }

    /// Restart from the first note of `track`.
    pub fn play(&mut self, track: Track) {
        *self = Self {
            track: Some(track),
            ..Self::new()
        };
    }

    pub fn stop(&mut self) {
        self.track = None;
        self.index = 0;
        self.next_at_ms = None;
    }

    pub const fn track(&self) -> Option<Track> {
        self.track
    }

    /// Move playback forward to `now_ms`, returning what the buzzer should do.
    pub fn advance(&mut self, now_ms: u64) -> Option<ToneCommand> {
        let mut command = None;
        if let Some(off) = self.note_off_at_ms
            && now_ms >= off
        {
            self.note_off_at_ms = None;
            command = Some(ToneCommand::Stop);
        }

        let Some(track) = self.track else {
            return command;
        };
        if self.next_at_ms.is_some_and(|due| now_ms < due) {
            return command;
        }

        let Some(note) = track.notes().get(self.index).copied() else {
            if track.looping() {
                self.index = 0;
            } else {
                self.stop();
            }
            return command;
        };

        self.index += 1;
        self.next_at_ms = Some(now_ms + note.dur_ms as u64 + NOTE_GAP_MS);
        if note.freq > 0 {
            self.note_off_at_ms = Some(now_ms + note.dur_ms as u64);
            command = Some(ToneCommand::Play(note.freq));
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_spaced_by_duration_plus_gap() {
        let mut cursor = MelodyCursor::new();
        cursor.play(Track::Intro);

        assert_eq!(cursor.advance(0), Some(ToneCommand::Play(523)));
        assert_eq!(cursor.advance(60), None);
        assert_eq!(cursor.advance(100), Some(ToneCommand::Stop));
        assert_eq!(cursor.advance(120), Some(ToneCommand::Play(659)));
    }

    #[test]
    fn once_track_stops_at_the_end() {
        let mut cursor = MelodyCursor::new();
        cursor.play(Track::GameOver);
        let mut now = 0;
        while cursor.track().is_some() && now < 60_000 {
            cursor.advance(now);
            now += 30;
        }
        assert_eq!(cursor.track(), None);
        assert!(now < 60_000);
    }

    #[test]
    fn looping_track_wraps_around() {
        let mut cursor = MelodyCursor::new();
        cursor.play(Track::Boss);
        let mut plays = heapless::Vec::<u16, 16>::new();
        let mut now = 0;
        while plays.len() < 6 {
            if let Some(ToneCommand::Play(freq)) = cursor.advance(now) {
                let _ = plays.push(freq);
            }
            now += 10;
        }
        assert_eq!(plays.as_slice(), &[150, 200, 150, 250, 150, 200]);
        assert_eq!(cursor.track(), Some(Track::Boss));
    }

    #[test]
    fn rest_does_not_sound() {
        let mut cursor = MelodyCursor::new();
        cursor.play(Track::Menu);
        cursor.index = MENU.len() - 1;
        assert_eq!(cursor.advance(0), None);
    }
}
