//! `dockron-docker` — [`dockron_core::ContainerRuntime`] backed by the
//! Docker CLI.
//!
//! Talks to the engine by spawning `docker` subprocesses over
//! `tokio::process`:
//!
//! | capability          | command                                               |
//! |---------------------|-------------------------------------------------------|
//! | ping                | `docker version --format '{{.Server.Version}}'`       |
//! | list / resolve      | `docker ps -q --no-trunc` + `docker inspect`          |
//! | lifecycle events    | `docker events --filter type=container --format json` |
//! | exec                | `docker exec <id> /bin/sh -c <command>`               |
//!
//! `inspect` is used instead of `docker ps --format` for listings because the
//! latter flattens labels into a comma-separated string that cannot round-trip
//! values containing commas — and job commands routinely do.

pub mod client;
pub mod wire;

pub use client::DockerCli;
