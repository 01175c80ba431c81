#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleTracker,
    ConfigModuleSummary,
    ConfigModuleClio,
    ClosurePolicySummarize,
    ClosurePolicyDiscard,
    ClioTokenSaved,

    // === PROMPTS ===
    PromptSelectModules,
    PromptUserId,
    PromptIdleThreshold,
    PromptMirrorInterval,
    PromptClosurePolicy,
    PromptSummaryApiUrl,
    PromptSummaryAuthToken,
    PromptClioApiUrl,
    PromptClioMatterId,
    PromptClioToken,

    // === TRACKING MESSAGES ===
    TrackingStarted { surface: String, session_id: String },
    TrackingPaused(String),
    SurfaceUnreadable(String),
    SessionFinalized { session_id: String, reason: String, elapsed: String },
    FinalizeDropped,
    MonitorShuttingDown,
    ReadingEvents(String),
    InvalidEventLine(usize, String),
    EventFileNotFound(String),
    EventReaderFailed(String),
    TrackSummary { events: usize, started: usize, finalized: usize, pauses: usize },
    DryRun,

    // === STORAGE MESSAGES ===
    StoreUnavailable { store: String, error: String },
    NoStorageBackends,
    MirrorCleared(usize),
    NoStatusRecorded,

    // === BILLING MESSAGES ===
    SummaryFallback(String),
    SummaryServiceUnavailable(String),
    HistoryWriteFailed(String),
    HistoryUnavailable(String),
    ClioLogged(String),
    ClioLogFailed(String),
    ClioUnavailable(String),

    // === HISTORY MESSAGES ===
    HistoryHeader(String),
    NoEntriesForDate(String),
    InvalidDate(String),

    // === TABLE LABELS ===
    StatusStateLabel,
    StatusSessionLabel,
    StatusElapsedLabel,
    StatusUpdatedLabel,
    StatusIdle,
    StatusActive,
    StatusPaused,
    ReasonLabel,
    RecipientLabel,
    SubjectLabel,
    BillableLabel,
    SummaryLabel,
    TotalLabel,
}
