use std::time::{Duration, Instant};

use crate::game::SessionHooks;
use crate::mode::GameMode;

pub const MUSIC_VOLUME: f32 = 0.45;
pub const GAME_MUSIC_VOLUME: f32 = 0.5;
pub const FADE_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    MainMenu,
    TimeAttack,
    Survival,
    Conquest,
}

impl Track {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::TimeAttack => Track::TimeAttack,
            GameMode::Survival => Track::Survival,
            GameMode::Conquest => Track::Conquest,
        }
    }

    pub fn file(&self) -> &'static str {
        match self {
            Track::MainMenu => "music/mainbg.mp3",
            Track::TimeAttack => "music/attackmode_song.mp3",
            Track::Survival => "music/survivalmode_song.mp3",
            Track::Conquest => "music/conquestmode_song.mp3",
        }
    }

    fn volume(&self) -> f32 {
        match self {
            Track::MainMenu => MUSIC_VOLUME,
            _ => GAME_MUSIC_VOLUME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
}

impl Fade {
    fn volume_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (now.saturating_duration_since(self.started_at).as_secs_f32()
            / self.duration.as_secs_f32())
        .min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

/// Background music and sound-effect state for the whole app.
///
/// One instance is created at startup and handed to each session as its
/// [`SessionHooks`]. Playback itself is not wired to an audio device; every
/// cue is logged so the state can be followed.
#[derive(Debug, Clone)]
pub struct MusicController {
    music_on: bool,
    track: Track,
    playing: bool,
    /// menu track position, restored when coming back from a game
    menu_position: Duration,
    playing_since: Option<Instant>,
    volume: f32,
    fade: Option<Fade>,
    clicks: u32,
}

impl MusicController {
    pub fn new(music_on: bool) -> Self {
        Self {
            music_on,
            track: Track::MainMenu,
            playing: false,
            menu_position: Duration::ZERO,
            playing_since: None,
            volume: 0.0,
            fade: None,
            clicks: 0,
        }
    }

    pub fn is_music_on(&self) -> bool {
        self.music_on
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn menu_position(&self) -> Duration {
        self.menu_position
    }

    /// Flips music on or off and returns the new setting.
    pub fn toggle(&mut self, now: Instant) -> bool {
        self.music_on = !self.music_on;
        log::info!("music {}", if self.music_on { "on" } else { "off" });
        if self.music_on {
            self.play_and_fade_in(now);
        } else {
            self.stop(now);
        }
        self.music_on
    }

    /// Switches to `track` and fades it in when music is on.
    pub fn start(&mut self, track: Track, now: Instant) {
        self.stop_hard(now);
        self.track = track;
        if self.music_on {
            self.play_and_fade_in(now);
        }
        log::debug!("track changed to {}", track.file());
    }

    /// Fades out and pauses, remembering where the menu track was.
    pub fn stop(&mut self, now: Instant) {
        if !self.playing {
            return;
        }
        self.save_position(now);
        self.fade = Some(Fade {
            from: self.volume_at(now),
            to: 0.0,
            started_at: now,
            duration: FADE_DURATION,
        });
    }

    /// Stops immediately without a fade.
    pub fn stop_hard(&mut self, now: Instant) {
        if self.playing {
            self.save_position(now);
            log::debug!("hard stop of {}", self.track.file());
        }
        self.fade = None;
        self.playing = false;
        self.playing_since = None;
        self.volume = 0.0;
    }

    /// Back to the menu track from its saved position, if music is on.
    pub fn resume(&mut self, now: Instant) {
        self.stop_hard(now);
        self.track = Track::MainMenu;
        if self.music_on {
            self.play_and_fade_in(now);
        }
    }

    pub fn play_click(&mut self) {
        self.clicks += 1;
        log::trace!("click");
    }

    pub fn volume_at(&self, now: Instant) -> f32 {
        match &self.fade {
            Some(fade) => fade.volume_at(now),
            None => self.volume,
        }
    }

    /// Settles finished fades; a fade to silence pauses playback.
    pub fn update(&mut self, now: Instant) {
        let Some(fade) = self.fade else {
            return;
        };
        if !fade.is_done(now) {
            return;
        }
        self.volume = fade.to;
        self.fade = None;
        if fade.to == 0.0 {
            self.playing = false;
            self.playing_since = None;
        }
    }

    fn play_and_fade_in(&mut self, now: Instant) {
        if !self.playing {
            self.playing = true;
            self.playing_since = Some(now);
            log::debug!(
                "playing {} from {:.1}s",
                self.track.file(),
                self.start_offset().as_secs_f32()
            );
        }
        self.fade = Some(Fade {
            from: self.volume_at(now),
            to: self.track.volume(),
            started_at: now,
            duration: FADE_DURATION,
        });
    }

    fn start_offset(&self) -> Duration {
        match self.track {
            Track::MainMenu => self.menu_position,
            _ => Duration::ZERO,
        }
    }

    fn save_position(&mut self, now: Instant) {
        if self.track != Track::MainMenu {
            return;
        }
        if let Some(since) = self.playing_since.take() {
            self.menu_position += now.saturating_duration_since(since);
            self.playing_since = Some(now);
        }
    }
}

impl Default for MusicController {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SessionHooks for MusicController {
    fn on_session_start(&mut self, mode: GameMode, now: Instant) {
        self.start(Track::for_mode(mode), now);
    }

    fn on_session_end(&mut self, now: Instant) {
        self.stop_hard(now);
    }

    fn on_return_to_menu(&mut self, now: Instant) {
        self.resume(now);
    }
}
