mod tests {
    use embassy_time::{Duration, Instant};
    use tubeclock_display::frame_scheduler::DEFAULT_FRAME_DURATION;
    use tubeclock_display::intent_processor::IntentEffects;
    use tubeclock_display::{
        ClockTime, DiagnosticStatus, DisplayConfig, DisplayIntent, DisplayMode, DisplayType,
        FrameScheduler, IntentChannel, LedDriver, Renderer, Rgb, SubFrames, TickInputs,
        TimeField, TransitionKind, TubeDriver, ValueRequest,
    };

    fn clock(second: u8) -> ClockTime {
        ClockTime {
            year: 2024,
            month: 3,
            day: 15,
            hour: 12,
            minute: 34,
            second,
            weekday: 6,
        }
    }

    fn tick(config: &DisplayConfig, ms: u64, second: u8) -> TickInputs<'_> {
        TickInputs {
            now: Instant::from_millis(ms),
            time: clock(second),
            config,
            ambient: 1023,
            pulse_ms: 0,
            blank_tubes: false,
            blank_leds: false,
            separators: [true, false],
        }
    }

    #[test]
    fn test_shows_time_by_default() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        renderer.render(&tick(&config, 0, 56));
        assert_eq!(renderer.mode(), DisplayMode::Time);
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 5, 6]);
        assert!(!renderer.leds().sync_colour_time());
    }

    #[test]
    fn test_value_display_expires_back_to_time() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();
        renderer.render(&tick(&config, 0, 56));

        channel
            .sender()
            .try_send(DisplayIntent::ShowValue(ValueRequest {
                value: 42,
                format: 222_222,
                seconds: 2,
            }))
            .unwrap();
        renderer.render(&tick(&config, 10, 56));
        assert_eq!(renderer.mode(), DisplayMode::Value);
        assert_eq!(renderer.output().digits(), [0, 0, 0, 0, 4, 2]);
        assert!(renderer.leds().sync_colour_time());

        renderer.render(&tick(&config, 1000, 57));
        assert_eq!(renderer.mode(), DisplayMode::Value);

        renderer.render(&tick(&config, 2000, 58));
        assert_eq!(renderer.mode(), DisplayMode::Time);
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 5, 8]);
    }

    #[test]
    fn test_bang_transition_shows_date_and_reverts() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel
            .try_send(DisplayIntent::StartTransition(TransitionKind::Bang))
            .unwrap();
        renderer.render(&tick(&config, 0, 56));
        assert!(renderer.is_transition_on_display(Instant::from_millis(0)));
        assert!(
            renderer
                .output()
                .display_types()
                .iter()
                .all(|display_type| *display_type == DisplayType::Blanked)
        );
        assert!(renderer.leds().sync_colour_time());

        renderer.render(&tick(&config, 1000, 57));
        assert_eq!(renderer.output().digits(), [1, 5, 0, 3, 2, 4]);

        renderer.render(&tick(&config, 6000, 2));
        assert!(renderer.transition().is_none());
        assert_eq!(renderer.mode(), DisplayMode::Time);
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 0, 2]);
        assert!(!renderer.leds().sync_colour_time());
    }

    #[test]
    fn test_second_start_is_ignored_while_running() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel
            .try_send(DisplayIntent::StartTransition(TransitionKind::Wipe))
            .unwrap();
        renderer.render(&tick(&config, 0, 0));
        channel
            .try_send(DisplayIntent::StartTransition(TransitionKind::Bang))
            .unwrap();
        renderer.render(&tick(&config, 100, 0));

        let transition = renderer.transition().unwrap();
        assert_eq!(transition.kind(), TransitionKind::Wipe);
        assert_eq!(transition.end(), Some(Instant::from_millis(5800)));
    }

    #[test]
    fn test_cancel_transition_restores_time() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel
            .try_send(DisplayIntent::StartTransition(TransitionKind::Bang))
            .unwrap();
        renderer.render(&tick(&config, 0, 56));
        channel.try_send(DisplayIntent::CancelTransition).unwrap();
        renderer.render(&tick(&config, 100, 56));

        assert!(renderer.transition().is_none());
        assert_eq!(renderer.output().display_type(3), DisplayType::Normal);
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_transition_needs_time_mode() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel.try_send(DisplayIntent::TestDigits).unwrap();
        channel
            .try_send(DisplayIntent::StartTransition(TransitionKind::Wipe))
            .unwrap();
        renderer.render(&tick(&config, 0, 7));

        assert!(renderer.transition().is_none());
        assert_eq!(renderer.mode(), DisplayMode::TestDigits);
        assert_eq!(renderer.output().digits(), [2, 1, 0, 9, 8, 7]);
    }

    #[test]
    fn test_config_display() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel
            .try_send(DisplayIntent::ShowConfigInt {
                value: 1234,
                number: 7,
            })
            .unwrap();
        renderer.render(&tick(&config, 0, 0));
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 0, 7]);
        assert_eq!(renderer.output().display_type(3), DisplayType::Normal);
        assert_eq!(renderer.output().display_type(4), DisplayType::Blink);
        assert_eq!(renderer.output().display_type(5), DisplayType::Blink);

        channel
            .try_send(DisplayIntent::ShowConfigBool {
                value: true,
                number: 3,
            })
            .unwrap();
        renderer.render(&tick(&config, 10, 0));
        assert_eq!(renderer.output().digits(), [0, 0, 0, 1, 0, 3]);
    }

    #[test]
    fn test_set_time_highlights_field() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel.try_send(DisplayIntent::SetTime(TimeField::Days)).unwrap();
        renderer.render(&tick(&config, 0, 0));
        assert_eq!(renderer.output().digits(), [1, 5, 0, 3, 2, 4]);
        assert_eq!(renderer.output().display_type(0), DisplayType::Blink);
        assert_eq!(renderer.output().display_type(1), DisplayType::Blink);
        assert_eq!(renderer.output().display_type(2), DisplayType::Normal);

        channel.try_send(DisplayIntent::SetTime(TimeField::Minutes)).unwrap();
        renderer.render(&tick(&config, 10, 0));
        assert_eq!(renderer.output().digits(), [1, 2, 3, 4, 0, 0]);
        assert_eq!(renderer.output().display_type(2), DisplayType::Blink);
    }

    #[test]
    fn test_ambient_and_ip_displays() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        channel.try_send(DisplayIntent::ShowAmbient).unwrap();
        let mut inputs = tick(&config, 0, 0);
        inputs.ambient = 987;
        renderer.render(&inputs);
        assert_eq!(renderer.output().digits(), [0, 9, 8, 7, 0, 0]);

        channel
            .try_send(DisplayIntent::ShowIpPair {
                first: 10,
                second: 1,
            })
            .unwrap();
        renderer.render(&tick(&config, 10, 0));
        assert_eq!(renderer.output().digits(), [0, 1, 0, 0, 0, 1]);

        channel.try_send(DisplayIntent::ShowTime).unwrap();
        renderer.render(&tick(&config, 20, 0));
        assert_eq!(renderer.mode(), DisplayMode::Time);
    }

    #[test]
    fn test_blanked_tubes_are_dark() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);
        let config = DisplayConfig::default();

        let mut inputs = tick(&config, 0, 0);
        inputs.blank_tubes = true;
        inputs.blank_leds = true;
        let frame = renderer.render(&inputs);
        assert!(frame.sub_frames.is_dark());
        assert!(frame.pixels.iter().all(|pixel| *pixel == Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_diagnostic_frame() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut renderer = Renderer::new(channel.receiver(), 1);

        let frame = renderer.render_diagnostic(111_111, 0, DiagnosticStatus::Red);
        assert_eq!(frame.sub_frames.duty(0), 20);
        assert_eq!(frame.pixels[0], Rgb::new(0xff, 0, 0));
        assert_eq!(frame.pixels[1], Rgb::new(0x1f, 0x1f, 0x1f));
    }

    #[test]
    fn test_intent_effects_fold() {
        let mut effects = IntentEffects::default();
        assert!(!effects.has_effects());

        effects.push(&DisplayIntent::ShowTime);
        effects.push(&DisplayIntent::StartTransition(TransitionKind::Wipe));
        assert_eq!(effects.mode, Some(DisplayMode::Time));
        assert!(effects.has_effects());

        effects.push(&DisplayIntent::ShowAmbient);
        assert_eq!(effects.mode, Some(DisplayMode::Ambient));
        assert_ne!(
            effects.transition,
            Some(tubeclock_display::intent_processor::TransitionRequest::Start(
                TransitionKind::Wipe
            ))
        );
    }

    #[derive(Default)]
    struct RecordingTubes {
        writes: usize,
        last_first_word: u32,
    }

    impl TubeDriver for RecordingTubes {
        fn write(&mut self, frames: &SubFrames) {
            self.writes += 1;
            self.last_first_word = frames.slot(0).0;
        }
    }

    #[derive(Default)]
    struct RecordingLeds {
        writes: usize,
        pixels: usize,
    }

    impl LedDriver for RecordingLeds {
        fn write(&mut self, colors: &[Rgb]) {
            self.writes += 1;
            self.pixels = colors.len();
        }
    }

    #[test]
    fn test_scheduler_paces_frames() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let renderer = Renderer::new(channel.receiver(), 1);
        let mut scheduler =
            FrameScheduler::new(renderer, RecordingTubes::default(), RecordingLeds::default());
        let config = DisplayConfig::default();

        let result = scheduler.tick(&tick(&config, 0, 0));
        assert_eq!(result.next_deadline, Instant::from_millis(10));
        assert_eq!(result.sleep_duration, DEFAULT_FRAME_DURATION);

        let result = scheduler.tick(&tick(&config, 14, 0));
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(6));

        // Stalled for longer than two frames, the backlog is dropped
        let result = scheduler.tick(&tick(&config, 100, 0));
        assert_eq!(result.next_deadline, Instant::from_millis(110));

        assert_eq!(scheduler.tube_driver().writes, 3);
        assert_eq!(scheduler.led_driver().writes, 3);
        assert_eq!(scheduler.led_driver().pixels, 12);
        assert_ne!(scheduler.tube_driver().last_first_word, 0);
    }

    #[test]
    fn test_scheduler_diagnostic() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let renderer = Renderer::new(channel.receiver(), 1);
        let mut scheduler =
            FrameScheduler::new(renderer, RecordingTubes::default(), RecordingLeds::default());

        let result = scheduler.diagnostic(Instant::from_millis(500), 0, 1, DiagnosticStatus::Blue);
        assert_eq!(result.next_deadline, Instant::from_millis(510));
        assert_eq!(scheduler.tube_driver().writes, 1);
        assert_eq!(scheduler.led_driver().writes, 1);
    }
}
