mod common;
mod gate;
mod routing;
