use axt_error::define_hw_error;

define_hw_error! {
    /// Errors reported by the timer pool.
    ///
    /// A channel stuck asserting TINT is not detected; the dispatcher keeps
    /// acknowledging it.
    pub enum TimerError(0x41) {
        /// Every channel is owned. Retry later or free one.
        NoChannelAvailable = 0x01 => "No timer channel available",
        /// Caller does not own the channel; nothing was changed.
        NotOwner = 0x02 => "Caller does not own this timer channel",
        /// Handle does not name a channel of this pool.
        InvalidHandle = 0x03 => "Timer handle out of range",
        /// Period or frequency converts to a zero count.
        InvalidPeriod = 0x04 => "Requested period is not representable",
        /// Count does not fit the 32-bit load register.
        CountOverflow = 0x05 => "Reload count exceeds 32 bits",
        AlreadyInitialized = 0x06 => "Timer pool already initialized",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_sit_in_the_timer_subsystem() {
        assert_eq!(TimerError::NoChannelAvailable.code(), 0x4101);
        assert_eq!(TimerError::AlreadyInitialized.code(), 0x4106);
        assert_eq!(
            std::format!("{}", TimerError::NotOwner),
            "E4102: Caller does not own this timer channel"
        );
    }
}
