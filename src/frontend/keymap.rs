use sdl2::keyboard::Keycode;

/// Keypad index for a host key, using the left-hand side of a QWERTY board:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn keypad_index(key: Keycode) -> Option<usize> {
    let index = match key {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,

        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,

        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,

        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,

        _ => return None,
    };
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_keypad_key_mapped_once() {
        let keys = [
            Keycode::Num1,
            Keycode::Num2,
            Keycode::Num3,
            Keycode::Num4,
            Keycode::Q,
            Keycode::W,
            Keycode::E,
            Keycode::R,
            Keycode::A,
            Keycode::S,
            Keycode::D,
            Keycode::F,
            Keycode::Z,
            Keycode::X,
            Keycode::C,
            Keycode::V,
        ];
        let mut seen = [false; chip8::NUM_KEYS];
        for &k in keys.iter() {
            let index = keypad_index(k).unwrap();
            assert!(!seen[index], "{:?} maps to a key already taken", k);
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_layout_corners() {
        assert_eq!(keypad_index(Keycode::Num1), Some(0x1));
        assert_eq!(keypad_index(Keycode::Num4), Some(0xC));
        assert_eq!(keypad_index(Keycode::X), Some(0x0));
        assert_eq!(keypad_index(Keycode::V), Some(0xF));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(keypad_index(Keycode::Escape), None);
        assert_eq!(keypad_index(Keycode::Num5), None);
        assert_eq!(keypad_index(Keycode::Space), None);
    }
}
