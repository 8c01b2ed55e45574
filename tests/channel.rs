mod tests {
    use tubeclock_display::channel::{Channel, TryReceiveError, TrySendError};
    use tubeclock_display::{DisplayIntent, IntentChannel, IntentProcessor};

    #[test]
    fn test_full_channel_hands_value_back() {
        let channel: Channel<u8, 2> = Channel::new();
        let sender = channel.sender();
        assert_eq!(sender.try_send(1), Ok(()));
        assert_eq!(sender.try_send(2), Ok(()));
        assert_eq!(sender.try_send(3), Err(TrySendError(3)));
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_receive_in_order() {
        let channel: Channel<u8, 4> = Channel::new();
        let receiver = channel.receiver();
        assert_eq!(receiver.try_receive(), Err(TryReceiveError));

        channel.try_send(7).unwrap();
        channel.try_send(9).unwrap();
        assert_eq!(receiver.try_receive(), Ok(7));
        assert_eq!(receiver.drain().collect::<Vec<_>>(), vec![9]);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_clear() {
        let channel: Channel<u8, 4> = Channel::new();
        channel.try_send(1).unwrap();
        channel.clear();
        assert!(channel.is_empty());
    }

    #[test]
    fn test_processor_drains_everything() {
        let channel: IntentChannel<4> = IntentChannel::new();
        let mut processor = IntentProcessor::new(channel.receiver());
        channel.try_send(DisplayIntent::TestDigits).unwrap();
        channel.try_send(DisplayIntent::ShowTime).unwrap();

        let effects = processor.process_pending();
        assert!(effects.has_effects());
        assert!(channel.is_empty());
        assert!(!processor.process_pending().has_effects());
    }
}
