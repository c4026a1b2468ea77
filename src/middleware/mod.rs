//! This module contains general purpose middleware.

pub(crate) mod logging;
