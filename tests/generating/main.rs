mod distribution;
mod properties;
