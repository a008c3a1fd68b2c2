mod memory_sink;
mod seek;
mod wireless;
