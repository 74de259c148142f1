mod entity;
mod models;
