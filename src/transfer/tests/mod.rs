mod common;
mod emitter;
