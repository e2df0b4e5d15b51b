#[macro_use]
extern crate serde_derive;

mod channel;
mod cli;
mod common;
mod config;
mod error;
mod pager;
mod resource;
mod video;
mod youtube;

fn main() -> anyhow::Result<()> {
    cli::main()
}
