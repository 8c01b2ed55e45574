mod tests {
    use tubeclock_display::encoder::{
        Chain, DECODE_SEPARATOR, DigitDrive, DigitSlot, SubFrames, decode_pattern,
        encode_digit, pack_position, unpack_position,
    };

    #[test]
    fn test_encode_digit_zero_uses_bit_nine() {
        assert_eq!(encode_digit(0), 0x0200);
        assert_eq!(encode_digit(1), 0x0001);
        assert_eq!(encode_digit(9), 0x0100);
    }

    #[test]
    fn test_encode_digit_reduces_modulo_ten() {
        assert_eq!(encode_digit(13), encode_digit(3));
    }

    #[test]
    fn test_decode_pattern() {
        assert_eq!(decode_pattern(0x0200), Some(0));
        assert_eq!(decode_pattern(0x0040), Some(7));
        assert_eq!(decode_pattern(0), None);
        assert_eq!(decode_pattern(0x0003), None);
    }

    #[test]
    fn test_digit_slots() {
        assert_eq!(
            DigitSlot::of(0),
            DigitSlot {
                chain: Chain::Second,
                position: 0
            }
        );
        assert_eq!(
            DigitSlot::of(2),
            DigitSlot {
                chain: Chain::Second,
                position: 2
            }
        );
        assert_eq!(
            DigitSlot::of(3),
            DigitSlot {
                chain: Chain::First,
                position: 0
            }
        );
        assert_eq!(
            DigitSlot::of(5),
            DigitSlot {
                chain: Chain::First,
                position: 2
            }
        );
    }

    #[test]
    fn test_pack_position_keeps_neighbours() {
        let word = pack_position(0, 0, 0x0001);
        let word = pack_position(word, 2, 0x0200);
        assert_eq!(word, 0x0001 | (0x0200 << 20));
        assert_eq!(unpack_position(word, 0), 0x0001);
        assert_eq!(unpack_position(word, 1), 0);
        assert_eq!(unpack_position(word, 2), 0x0200);

        let word = pack_position(word, 0, 0);
        assert_eq!(word, 0x0200 << 20);
    }

    #[test]
    fn test_drive_clamps_dim_factor() {
        let drive = DigitDrive {
            value: 1,
            previous: 1,
            dim_factor: 25,
            switch_time: 0,
            blanked: false,
        }
        .clamped();
        assert_eq!(drive.dim_factor, 20);

        let drive = DigitDrive {
            dim_factor: 0,
            switch_time: 3,
            ..drive
        }
        .clamped();
        assert_eq!(drive.dim_factor, 1);
        assert_eq!(drive.switch_time, 0);
    }

    #[test]
    fn test_drive_clamps_switch_time_below_dim_factor() {
        let drive = DigitDrive {
            value: 1,
            previous: 2,
            dim_factor: 8,
            switch_time: 30,
            blanked: false,
        }
        .clamped();
        assert_eq!(drive.switch_time, 7);
    }

    #[test]
    fn test_column_switches_value_and_goes_dark() {
        let column = DigitDrive {
            value: 5,
            previous: 3,
            dim_factor: 10,
            switch_time: 4,
            blanked: false,
        }
        .column();

        for (idx, pattern) in column.iter().enumerate() {
            let expected = match idx {
                0..4 => encode_digit(5),
                4..10 => encode_digit(3),
                _ => 0,
            };
            assert_eq!(*pattern, expected, "slot {idx}");
        }
    }

    #[test]
    fn test_column_without_switch_shows_value_only() {
        let column = DigitDrive {
            value: 8,
            previous: 2,
            dim_factor: 20,
            switch_time: 0,
            blanked: false,
        }
        .column();
        assert!(column.iter().all(|pattern| *pattern == encode_digit(8)));
    }

    #[test]
    fn test_blanked_column_is_dark() {
        let column = DigitDrive {
            value: 8,
            previous: 8,
            dim_factor: 20,
            switch_time: 0,
            blanked: true,
        }
        .column();
        assert!(column.iter().all(|pattern| *pattern == 0));
    }

    #[test]
    fn test_sub_frames_route_digits_to_chains() {
        let mut frames = SubFrames::new();
        let column = DigitDrive {
            value: 7,
            previous: 7,
            dim_factor: 20,
            switch_time: 0,
            blanked: false,
        }
        .column();
        frames.set_digit(4, &column);

        assert!(frames.chain(Chain::Second).iter().all(|word| *word == 0));
        assert!(
            frames
                .chain(Chain::First)
                .iter()
                .all(|word| *word == u32::from(encode_digit(7)) << 10)
        );
        assert_eq!(frames.duty(4), 20);
        assert_eq!(frames.digit_pattern(4, 0), encode_digit(7));
        assert_eq!(decode_pattern(frames.digit_pattern(4, 19)), Some(7));
    }

    #[test]
    fn test_separators_follow_threshold() {
        let mut frames = SubFrames::new();
        frames.set_separators(5, true, false);

        for idx in 0..20 {
            let (first, second) = frames.slot(idx);
            if idx < 5 {
                assert_eq!(first, DECODE_SEPARATOR[1]);
                assert_eq!(second, DECODE_SEPARATOR[0]);
            } else {
                assert_eq!(first, 0);
                assert_eq!(second, 0);
            }
        }

        frames.set_separators(0, true, true);
        assert!(frames.is_dark());
    }
}
