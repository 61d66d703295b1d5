//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Study buddy matcher.
///
/// Tracks student profiles, course enrollments, and weekly availability,
/// suggests study partners with enough overlapping free time, and runs the
/// propose/confirm workflow for study sessions.
#[derive(Debug, Parser)]
#[command(name = "buddy", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage student profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage course enrollments.
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },

    /// Manage weekly availability windows.
    Avail {
        #[command(subcommand)]
        action: AvailAction,
    },

    /// List classmates enrolled in a course.
    Classmates {
        /// Requesting student's username.
        username: String,

        /// Course code to look up.
        course: String,
    },

    /// Suggest study partners who share a course and at least 30 minutes of
    /// weekly availability overlap.
    Suggest {
        /// Requesting student's username.
        username: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Propose a study session to a classmate.
    Propose {
        /// Initiating student's username.
        initiator: String,

        /// Invited student's username.
        invitee: String,

        /// Course code for the session.
        course: String,

        /// Day of the week (e.g. Mon, tuesday).
        day: String,

        /// Start time, 24-hour or 12-hour (e.g. 14:00 or 2:00 pm).
        start: String,

        /// End time.
        end: String,
    },

    /// Confirm a proposed session as its invitee.
    Confirm {
        /// Session id to confirm.
        session_id: i64,

        /// Confirming student's username (must be the invitee).
        username: String,
    },

    /// List a student's sessions.
    Sessions {
        /// Student's username.
        username: String,

        /// Only incoming proposed sessions.
        #[arg(long)]
        proposed: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Profile subcommands.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Create a student profile.
    Create {
        /// Unique username.
        username: String,

        /// Display name.
        full_name: String,
    },

    /// Show a profile with courses and availability.
    Show {
        /// Username to show.
        username: String,
    },
}

/// Course enrollment subcommands.
#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// Enroll a student in a course.
    Add {
        username: String,

        /// Course code (e.g. "CS 200").
        course: String,
    },

    /// Drop a course. Succeeds even when not enrolled.
    Remove {
        username: String,
        course: String,
    },

    /// List a student's courses.
    List { username: String },
}

/// Availability subcommands.
#[derive(Debug, Subcommand)]
pub enum AvailAction {
    /// Add a weekly availability window.
    Add {
        username: String,

        /// Day of the week (e.g. Mon, tuesday).
        day: String,

        /// Window start time.
        start: String,

        /// Window end time.
        end: String,
    },

    /// Remove a window by id. Succeeds even when absent.
    Remove {
        /// Window id (from `buddy avail list`).
        id: i64,
    },

    /// List a student's windows in week order.
    List { username: String },
}
