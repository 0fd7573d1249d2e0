//! Driver error codes.
//!
//! Every driver crate declares its error enum through [`define_hw_error!`], so
//! a code seen on a serial console maps back to one variant: the subsystem
//! byte is the high byte, the variant's discriminant the low byte.
//!
//! ```ignore
//! define_hw_error! {
//!     pub enum TimerError(0x41) {
//!         NoChannelAvailable = 0x01 => "No timer channel available",
//!         NotOwner = 0x02 => "Caller does not own this timer channel",
//!     }
//! }
//! ```

#![no_std]

/// Declare a driver error enum.
///
/// The variant code is the enum discriminant (`#[repr(u8)]`), so it costs
/// nothing to carry and cannot drift from the declaration. The generated type
/// derives `Debug, Clone, Copy, PartialEq, Eq`, and gets `SUBSYSTEM`,
/// `code()`, `description()`, `Display` (`E4102: ...`) and
/// `core::error::Error`.
#[macro_export]
macro_rules! define_hw_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($subsystem:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal => $desc:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $code,
            )+
        }

        impl $name {
            pub const SUBSYSTEM: u8 = $subsystem;

            /// `SUBSYSTEM << 8 | variant`.
            pub const fn code(self) -> u16 {
                ((Self::SUBSYSTEM as u16) << 8) | self as u16
            }

            pub const fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => $desc,)+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "E{:04X}: {}", self.code(), self.description())
            }
        }

        impl core::error::Error for $name {}
    };
}
