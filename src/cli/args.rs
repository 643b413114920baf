use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "studoro")]
#[command(about = "A pomodoro study timer with subjects, XP, and streaks")]
#[command(long_about = "studoro - A study timer for the terminal

Track focused study time with a pomodoro timer, record sessions against
subjects, and build streaks. Completed sessions earn XP toward levels.

QUICK START:
  studoro subject add \"Mathematics\"    Create a subject to study
  studoro timer start -s Mathematics     Start a 25-minute pomodoro
  studoro tui                            Run the live full-screen timer
  studoro stats report week              See your study week

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  studoro <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    /// Falls back to the configured default when omitted.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Control the study timer
    ///
    /// The timer runs a pomodoro cycle: 25 minutes of study, then a
    /// 5-minute break, with a 15-minute long break after every fourth
    /// pomodoro. Free mode counts up instead and never auto-completes.
    ///
    /// Timer state persists between invocations, so a timer started in
    /// one shell keeps counting down until you pause, reset, or it runs
    /// out.
    ///
    /// # Examples
    ///
    ///   studoro timer start -s Mathematics
    ///   studoro timer start --mode free
    ///   studoro timer status
    ///   studoro timer pause
    #[command(alias = "tm")]
    Timer(TimerArgs),

    /// Run the full-screen timer
    ///
    /// Opens an interactive terminal UI with a live countdown, progress
    /// gauge, and session counter.
    ///
    /// # Keys
    ///
    ///   space  start / pause
    ///   r      reset
    ///   s      skip to the next mode
    ///   m      cycle pomodoro / short break / long break
    ///   f      toggle free mode
    ///   q      quit
    Tui,

    /// Manage study subjects
    ///
    /// Subjects group your sessions: each pomodoro is recorded against
    /// one, and reports break study time down per subject.
    ///
    /// # Examples
    ///
    ///   studoro subject add "Mathematics" --icon 📐 --target 5
    ///   studoro subject list
    ///   studoro subject delete 2
    #[command(alias = "sub")]
    Subject(SubjectArgs),

    /// Manage study tasks
    ///
    /// A lightweight to-do list next to the timer. Tasks can link to a
    /// subject and carry a priority.
    ///
    /// # Examples
    ///
    ///   studoro task add "Review chapter 5" -s Mathematics -p high
    ///   studoro task list
    ///   studoro task done 3
    #[command(alias = "tk")]
    Task(TaskArgs),

    /// Show study statistics
    ///
    /// Summaries of your profile (level, XP, streaks), recent sessions,
    /// and aggregated reports by period.
    ///
    /// # Examples
    ///
    ///   studoro stats summary
    ///   studoro stats recent --limit 20
    ///   studoro stats report month
    #[command(alias = "st")]
    Stats(StatsArgs),

    /// Generate shell completions
    ///
    /// Prints a completion script for the given shell to stdout.
    ///
    /// # Examples
    ///
    ///   studoro completions zsh > ~/.zfunc/_studoro
    ///   studoro completions bash > /etc/bash_completion.d/studoro
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TimerArgs {
    #[command(subcommand)]
    pub command: TimerCommands,
}

#[derive(Subcommand)]
pub enum TimerCommands {
    /// Start or resume the timer
    ///
    /// Starting a paused timer resumes it. Starting a running timer is
    /// a no-op. Pomodoro mode requires a subject when any exist.
    Start {
        /// Subject to study, by name or id
        #[arg(short, long)]
        subject: Option<String>,

        /// Timer mode: pomodoro, short-break, long-break, or free
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Pause the running timer
    Pause,

    /// Reset the timer to its starting value
    ///
    /// No session is recorded. Safe to repeat.
    Reset,

    /// Skip to the next mode in the cycle
    ///
    /// The current run is discarded without recording a session.
    Skip,

    /// Switch the timer to a different mode
    ///
    /// Resets the clock to the new mode's starting value.
    Mode {
        /// Target mode: pomodoro, short-break, long-break, or free
        mode: String,
    },

    /// Show the current timer state
    #[command(alias = "s")]
    Status,

    /// Finish a free session and record it
    ///
    /// Free mode never completes on its own; this stops the count-up
    /// and records the elapsed time as a study session.
    Finish {
        /// Notes about the session
        #[arg(short, long)]
        notes: Option<String>,

        /// Mood: excellent, good, neutral, tired, or frustrated
        #[arg(short, long)]
        mood: Option<String>,

        /// Exercises answered correctly
        #[arg(long)]
        correct: Option<u32>,

        /// Exercises answered incorrectly
        #[arg(long)]
        wrong: Option<u32>,
    },

    /// Discard the active timer entirely
    Cancel,
}

#[derive(Args)]
pub struct SubjectArgs {
    #[command(subcommand)]
    pub command: SubjectCommands,
}

#[derive(Subcommand)]
pub enum SubjectCommands {
    /// Add a new subject
    #[command(alias = "a")]
    Add {
        /// Subject name, must be unique
        name: String,

        /// Emoji or short icon shown next to the name
        #[arg(short, long)]
        icon: Option<String>,

        /// Display color name
        #[arg(short, long)]
        color: Option<String>,

        /// Weekly study target in hours
        #[arg(short, long)]
        target: Option<f64>,
    },

    /// List all subjects
    #[command(alias = "ls")]
    List,

    /// Update a subject's fields
    Update {
        /// Subject id
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New icon
        #[arg(short, long)]
        icon: Option<String>,

        /// New color
        #[arg(short, long)]
        color: Option<String>,

        /// New weekly target in hours
        #[arg(short, long)]
        target: Option<f64>,
    },

    /// Delete a subject
    ///
    /// Recorded sessions and tasks keep their rows with the subject
    /// link cleared.
    #[command(alias = "rm")]
    Delete {
        /// Subject id
        id: i64,
    },
}

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a new task
    #[command(alias = "a")]
    Add {
        /// What to do
        title: String,

        /// Subject to link, by name or id
        #[arg(short, long)]
        subject: Option<String>,

        /// Priority: low, medium, or high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Toggle a task's completed state
    #[command(alias = "d")]
    Done {
        /// Task id
        id: i64,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: i64,
    },
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommands,
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// Show the profile: level, XP, and streaks
    #[command(alias = "sum")]
    Summary,

    /// List recent sessions
    Recent {
        /// Maximum number of sessions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Generate an aggregated study report
    Report {
        /// Period: today, week, month, or all
        #[arg(default_value = "week")]
        period: String,
    },
}
