use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const ROLL_SIZE_LIMIT: u64 = 20 * 1024 * 1024; // 20 MB
const ARCHIVE_COUNT: u32 = 5;

const FILE_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S)} {l} {t} - {m}\n";
const CONSOLE_PATTERN: &str = "{l} {t} - {m}\n";

/// Debug and up goes to a rolling gzip-archived file, info and up to
/// stderr. Paths are overridable so several instances can share a host.
pub fn init_logger() {
    let file_path =
        std::env::var("PICKEM_LOG_FILE").unwrap_or_else(|_| "logs/pickem-server.log".to_string());
    let archive_pattern = std::env::var("PICKEM_LOG_ARCHIVE")
        .unwrap_or_else(|_| "logs/pickem-server.{}.log.gz".to_string());

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern, ARCHIVE_COUNT)
        .expect("invalid log archive pattern");
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(ROLL_SIZE_LIMIT)),
        Box::new(roller),
    );
    let file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(&file_path, Box::new(policy))
        .expect("failed to open log file");

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
                .build("console", Box::new(console)),
        )
        .build(
            Root::builder()
                .appender("file")
                .appender("console")
                .build(LevelFilter::Trace),
        )
        .expect("invalid logging configuration");

    log4rs::init_config(config).expect("failed to initialize logging");
}
