mod alpha;
mod errors;
mod health_check;
mod helpers;
mod referral;
mod waitlist;

pub use alpha::*;
pub use errors::*;
pub use health_check::*;
pub use helpers::*;
pub use referral::*;
pub use waitlist::*;
