mod errors;
mod formats;
