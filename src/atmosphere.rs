//! Ambient sound selector. Holds which track is active and the volume;
//! actual playback belongs to the client.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Sound {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

pub const SOUNDS: [Sound; 4] = [
    Sound {
        id: "rain",
        name: "Deep Rain",
        url: "https://orangefreesounds.com/wp-content/uploads/2023/06/Rain-storm-sound-effect.mp3",
    },
    Sound {
        id: "forest",
        name: "Forest",
        url: "https://orangefreesounds.com/wp-content/uploads/2025/02/Relaxing-spring-forest-sounds.mp3",
    },
    Sound {
        id: "brown",
        name: "Brown Noise",
        url: "https://www.orangefreesounds.com/wp-content/uploads/2018/12/Brown-noise-sleep.mp3",
    },
    Sound {
        id: "focus",
        name: "Focus",
        url: "https://orangefreesounds.com/wp-content/uploads/2025/07/Warm-relaxing-synthesizer-background-music-ambient-chillout-sound-for-meditation-and-focus.mp3",
    },
];

pub const DEFAULT_VOLUME: u8 = 50;
pub const MAX_VOLUME: u8 = 100;

pub fn find_sound(id: &str) -> Option<&'static Sound> {
    SOUNDS.iter().find(|s| s.id == id)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Mixer {
    active: Option<&'static str>,
    volume: u8,
    prev_volume: u8,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            active: None,
            volume: DEFAULT_VOLUME,
            prev_volume: DEFAULT_VOLUME,
        }
    }
}

impl Mixer {
    pub fn active(&self) -> Option<&'static Sound> {
        self.active.and_then(find_sound)
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some() && self.volume > 0
    }

    /// Select a track, or stop it when it is already the active one.
    /// Returns `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<Option<&'static Sound>> {
        let sound = find_sound(id)?;
        if self.active == Some(sound.id) {
            self.active = None;
        } else {
            self.active = Some(sound.id);
        }
        Some(self.active())
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    pub fn toggle_mute(&mut self) {
        if self.is_muted() {
            self.volume = self.prev_volume;
        } else {
            self.prev_volume = self.volume;
            self.volume = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_switches_and_stops() {
        let mut m = Mixer::default();
        assert_eq!(m.toggle("rain").unwrap().map(|s| s.name), Some("Deep Rain"));
        assert_eq!(m.toggle("forest").unwrap().map(|s| s.id), Some("forest"));
        assert_eq!(m.toggle("forest").unwrap(), None);
        assert!(m.toggle("whale-song").is_none());
        assert!(!m.is_playing());
    }

    #[test]
    fn mute_restores_previous_volume() {
        let mut m = Mixer::default();
        m.set_volume(80);
        m.toggle_mute();
        assert!(m.is_muted());
        m.toggle_mute();
        assert_eq!(m.volume(), 80);
        m.set_volume(250);
        assert_eq!(m.volume(), MAX_VOLUME);
    }
}
