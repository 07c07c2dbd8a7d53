mod blend;
mod common;
