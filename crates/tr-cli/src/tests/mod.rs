mod client;
mod migrate_commands;
