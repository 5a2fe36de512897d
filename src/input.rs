//! InputManager - handles the keyboard, knows which keys are held down.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::collections::HashMap;

use crate::InputSnapshot;

pub struct InputManager {
    // pressed keys (as their i32 codes) => true until the key press is consumed
    pressed: HashMap<i32, bool>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            pressed: HashMap::new(),
        }
    }

    /// Check if a key is held down.
    #[inline]
    pub fn key(&self, key: Keycode) -> bool {
        self.pressed.contains_key(&key2code(key))
    }

    /// Check for a key press, only once per press.
    #[inline]
    pub fn consume_key(&mut self, key: Keycode) -> bool {
        let found = self.pressed.get_mut(&key2code(key));
        let mut pressed = false;
        if let Some(flag) = found {
            pressed = *flag;
            *flag = false;
        }
        pressed
    }

    /// The movement keys, as one consistent snapshot for the current frame.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            forward: self.key(Keycode::W) || self.key(Keycode::Up),
            backward: self.key(Keycode::S) || self.key(Keycode::Down),
            rotate_left: self.key(Keycode::A) || self.key(Keycode::Left),
            rotate_right: self.key(Keycode::D) || self.key(Keycode::Right),
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyDown { keycode: Some(key), .. } => {
                self.set_pressed(*key);
            }
            Event::KeyUp { keycode: Some(key), .. } => {
                self.set_released(*key);
            }
            _ => {}
        }
    }

    #[inline]
    fn set_pressed(&mut self, key: Keycode) {
        // key repeats must not re-arm consume_key()
        self.pressed.entry(key2code(key)).or_insert(true);
    }

    #[inline]
    fn set_released(&mut self, key: Keycode) {
        self.pressed.remove(&key2code(key));
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

//------------------
//  Internal stuff

#[inline(always)]
fn key2code(key: Keycode) -> i32 {
    key as i32
}
