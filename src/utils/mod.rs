pub(crate) mod date;
pub(crate) mod debug;
pub(crate) mod timezone;

pub(crate) use date::parse_date;
pub(crate) use debug::{debug_enabled, set_debug};
pub(crate) use timezone::Timezone;
