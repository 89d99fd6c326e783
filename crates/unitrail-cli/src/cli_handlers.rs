use crate::cli_contract::{AppExit, Cli, Commands, OutputMode, ROBOT_SCHEMA_VERSION};
use crate::cli_normalize::format_cli_failure;
use crate::pipeline::{run_ingest, IngestError};
use chrono::SecondsFormat;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use unitrail_core::bus::{read_bus, EventBusWriter};
use unitrail_core::dead_letter::{read_dead_letters, DeadLetterStore};
use unitrail_core::error::NormalizeError;
use unitrail_core::event::UnifiedEventType;
use unitrail_ingest::all_mappings;

fn emit_json(value: Value) {
    match serde_json::to_string(&value) {
        Ok(line) => println!("{line}"),
        Err(err) => {
            // Last-resort envelope to avoid panicking in robot mode.
            let fallback = json!({
                "schema_version": ROBOT_SCHEMA_VERSION,
                "ok": false,
                "code": "RUNTIME_ERROR",
                "message": format!("failed to serialize JSON response: {err}"),
                "suggestions": [],
                "exit_code": AppExit::RuntimeError as u8,
            });
            println!("{fallback}");
        }
    }
}

pub(crate) fn emit_json_success(
    code: &str,
    message: &str,
    command: Option<&str>,
    exit_code: u8,
    notes: &[String],
    mut data: Value,
) {
    if data.is_null() {
        data = json!({});
    }
    let mut obj = json!({
        "schema_version": ROBOT_SCHEMA_VERSION,
        "ok": true,
        "code": code,
        "message": message,
        "suggestions": [],
        "exit_code": exit_code,
        "data": data,
    });
    if let Some(command) = command {
        obj["command"] = json!(command);
    }
    if !notes.is_empty() {
        obj["notes"] = json!(notes);
    }
    emit_json(obj);
}

pub(crate) fn emit_json_error(
    code: &str,
    message: &str,
    suggestions: &[String],
    notes: &[String],
    exit_code: u8,
) {
    let mut obj = json!({
        "schema_version": ROBOT_SCHEMA_VERSION,
        "ok": false,
        "code": code,
        "message": message,
        "suggestions": suggestions,
        "exit_code": exit_code,
    });
    if !notes.is_empty() {
        obj["notes"] = json!(notes);
    }
    emit_json(obj);
}

fn ensure_file_exists(path: &Path, label: &str) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("{} not found: {}", label, path.display()))
    }
}

fn hash_file_blake3(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

fn rejection_cause(reason: &NormalizeError) -> &'static str {
    match reason {
        NormalizeError::InvalidPayloadShape => "Payload root is not a JSON object.",
        NormalizeError::UnsupportedProvider { .. } => {
            "Provider is not one of the registered providers."
        }
        NormalizeError::MissingRequiredFields { .. } => {
            "Payload lacks the provider's required top-level keys."
        }
        NormalizeError::MissingNormalizedField { .. } => {
            "A unified field resolved to nothing in the payload."
        }
        NormalizeError::UnsupportedEventType { .. } => {
            "Raw event name has no unified translation."
        }
        NormalizeError::InvalidTimestamp { .. } => "Timestamp is not ISO-8601.",
    }
}

#[derive(Debug)]
struct StoreReport {
    path: String,
    exists: bool,
    records: usize,
    blake3: Option<String>,
}

impl StoreReport {
    fn absent(path: &Path) -> Self {
        StoreReport {
            path: path.display().to_string(),
            exists: false,
            records: 0,
            blake3: None,
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "path": self.path,
            "exists": self.exists,
            "records": self.records,
            "blake3": self.blake3,
        })
    }
}

fn bus_report(path: &Path) -> Result<StoreReport, String> {
    if !path.exists() {
        return Ok(StoreReport::absent(path));
    }
    let records = read_bus(path)
        .map_err(|e| format!("failed to read event bus {}: {e}", path.display()))?;
    Ok(StoreReport {
        path: path.display().to_string(),
        exists: true,
        records: records.len(),
        blake3: Some(hash_file_blake3(path)?),
    })
}

fn dead_letter_report(path: &Path) -> Result<StoreReport, String> {
    if !path.exists() {
        return Ok(StoreReport::absent(path));
    }
    let entries = read_dead_letters(path)
        .map_err(|e| format!("failed to read dead letters {}: {e}", path.display()))?;
    Ok(StoreReport {
        path: path.display().to_string(),
        exists: true,
        records: entries.len(),
        blake3: Some(hash_file_blake3(path)?),
    })
}

fn print_store_line(label: &str, report: &StoreReport) {
    if report.exists {
        println!("  {label} {} ({} records)", report.path, report.records);
        if let Some(digest) = &report.blake3 {
            println!("    blake3:     {digest}");
        }
    } else {
        println!("  {label} {} (absent)", report.path);
    }
}

pub(crate) fn handle_command(cli: Cli, mode: OutputMode, repair_notes: &[String]) -> AppExit {
    match cli.command {
        Commands::Ingest {
            provider,
            payload,
            bus,
            dead_letters,
        } => {
            if let Err(msg) = ensure_file_exists(&payload, "payload file") {
                let suggestions = vec![
                    format!("Check that `{}` exists and is readable.", payload.display()),
                    format!(
                        "unitrail ingest {} {} --bus {}",
                        provider,
                        payload.display(),
                        bus.display()
                    ),
                ];
                if mode == OutputMode::Json {
                    emit_json_error(
                        "NOT_FOUND",
                        &msg,
                        &suggestions,
                        repair_notes,
                        AppExit::NotFound as u8,
                    );
                } else {
                    eprintln!(
                        "{}",
                        format_cli_failure(
                            &format!("ingest failed: {msg}"),
                            "Payload path does not exist.",
                            &suggestions,
                            &[payload.display().to_string()],
                        )
                    );
                }
                return AppExit::NotFound;
            }

            let raw = match fs::read_to_string(&payload) {
                Ok(raw) => raw,
                Err(e) => {
                    let msg = format!("failed to read {}: {e}", payload.display());
                    let suggestions = vec![format!(
                        "Check permissions on `{}`.",
                        payload.display()
                    )];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "RUNTIME_ERROR",
                            &msg,
                            &suggestions,
                            repair_notes,
                            AppExit::RuntimeError as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest failed: {msg}"),
                                "Payload file exists but could not be read.",
                                &suggestions,
                                &[payload.display().to_string()],
                            )
                        );
                    }
                    return AppExit::RuntimeError;
                }
            };

            let document: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    let msg = format!("payload file is not valid JSON: {e}");
                    let suggestions = vec![
                        "Payload must be a single JSON document with an object root."
                            .to_string(),
                        format!("unitrail ingest {} {}", provider, payload.display()),
                    ];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "INVALID_ARGS",
                            &msg,
                            &suggestions,
                            repair_notes,
                            AppExit::InvalidArgs as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest failed: {msg}"),
                                "Payload file is not parseable JSON.",
                                &suggestions,
                                &[payload.display().to_string()],
                            )
                        );
                    }
                    return AppExit::InvalidArgs;
                }
            };

            let mut bus_writer = match EventBusWriter::open(&bus) {
                Ok(writer) => writer,
                Err(e) => {
                    let msg = format!("failed to open event bus {}: {e}", bus.display());
                    let suggestions = vec![format!(
                        "unitrail check --bus {} --dead-letters {}",
                        bus.display(),
                        dead_letters.display()
                    )];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "RUNTIME_ERROR",
                            &msg,
                            &suggestions,
                            repair_notes,
                            AppExit::RuntimeError as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest failed: {msg}"),
                                "Bus path is not writable or holds corrupt records.",
                                &suggestions,
                                &[bus.display().to_string()],
                            )
                        );
                    }
                    return AppExit::RuntimeError;
                }
            };

            let mut dead_letter_store = match DeadLetterStore::open(&dead_letters) {
                Ok(store) => store,
                Err(e) => {
                    let msg =
                        format!("failed to open dead letters {}: {e}", dead_letters.display());
                    let suggestions = vec![format!(
                        "unitrail check --bus {} --dead-letters {}",
                        bus.display(),
                        dead_letters.display()
                    )];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "RUNTIME_ERROR",
                            &msg,
                            &suggestions,
                            repair_notes,
                            AppExit::RuntimeError as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest failed: {msg}"),
                                "Dead-letter path is not writable or holds corrupt entries.",
                                &suggestions,
                                &[dead_letters.display().to_string()],
                            )
                        );
                    }
                    return AppExit::RuntimeError;
                }
            };

            match run_ingest(&provider, &document, &mut bus_writer, &mut dead_letter_store) {
                Ok(event) => {
                    let stamp = event
                        .timestamp_utc
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true);
                    if mode == OutputMode::Json {
                        emit_json_success(
                            "OK",
                            "Event published to the bus.",
                            Some("ingest"),
                            AppExit::Success as u8,
                            repair_notes,
                            json!({
                                "event_id": event.event_id,
                                "cloud_provider": event.cloud_provider.as_str(),
                                "unified_event_type": event.unified_event_type.as_str(),
                                "timestamp_utc": stamp,
                                "resource_id": event.resource_id,
                                "bus_path": bus.display().to_string(),
                                "published_count": bus_writer.published_count(),
                            }),
                        );
                    } else {
                        println!("Event published!");
                        println!("  Event:     {}", event.event_id);
                        println!("  Provider:  {}", event.cloud_provider);
                        println!("  Type:      {}", event.unified_event_type);
                        println!("  Timestamp: {stamp}");
                        println!("  Resource:  {}", event.resource_id);
                        println!(
                            "  Bus:       {} ({} records)",
                            bus.display(),
                            bus_writer.published_count()
                        );
                    }
                }
                Err(IngestError::Rejected { reason, dlq_id }) => {
                    let evidence = vec![
                        payload.display().to_string(),
                        format!("dead letter {dlq_id} @ {}", dead_letters.display()),
                    ];
                    let suggestions = vec![
                        format!(
                            "unitrail check --bus {} --dead-letters {}",
                            bus.display(),
                            dead_letters.display()
                        ),
                        "unitrail providers".to_string(),
                    ];
                    if mode == OutputMode::Json {
                        let mut resp = json!({
                            "schema_version": ROBOT_SCHEMA_VERSION,
                            "ok": false,
                            "code": "EVENT_REJECTED",
                            "message": reason.to_string(),
                            "suggestions": suggestions,
                            "reason_code": reason.code(),
                            "dlq_id": dlq_id,
                            "evidence": evidence,
                            "exit_code": AppExit::EventRejected as u8,
                        });
                        if !repair_notes.is_empty() {
                            resp["notes"] = json!(repair_notes);
                        }
                        emit_json(resp);
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest rejected: {reason}"),
                                rejection_cause(&reason),
                                &suggestions,
                                &evidence,
                            )
                        );
                    }
                    return AppExit::EventRejected;
                }
                Err(err @ IngestError::Publish(_)) => {
                    let suggestions = vec![
                        format!(
                            "unitrail check --bus {} --dead-letters {}",
                            bus.display(),
                            dead_letters.display()
                        ),
                        "unitrail --help".to_string(),
                    ];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "RUNTIME_ERROR",
                            &err.to_string(),
                            &suggestions,
                            repair_notes,
                            AppExit::RuntimeError as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("ingest failed: {err}"),
                                "Event bus file could not take the append.",
                                &suggestions,
                                &[bus.display().to_string()],
                            )
                        );
                    }
                    return AppExit::RuntimeError;
                }
            }
        }
        Commands::Check { bus, dead_letters } => {
            let reports = bus_report(&bus)
                .and_then(|bus_side| Ok((bus_side, dead_letter_report(&dead_letters)?)));
            let (bus_side, dlq_side) = match reports {
                Ok(reports) => reports,
                Err(msg) => {
                    let suggestions = vec![
                        "Move the corrupt file aside and re-run the check.".to_string(),
                        format!(
                            "unitrail check --bus {} --dead-letters {}",
                            bus.display(),
                            dead_letters.display()
                        ),
                    ];
                    if mode == OutputMode::Json {
                        emit_json_error(
                            "RUNTIME_ERROR",
                            &msg,
                            &suggestions,
                            repair_notes,
                            AppExit::RuntimeError as u8,
                        );
                    } else {
                        eprintln!(
                            "{}",
                            format_cli_failure(
                                &format!("check failed: {msg}"),
                                "A store file holds corrupt records or is unreadable.",
                                &suggestions,
                                &[
                                    bus.display().to_string(),
                                    dead_letters.display().to_string()
                                ],
                            )
                        );
                    }
                    return AppExit::RuntimeError;
                }
            };

            if mode == OutputMode::Json {
                emit_json_success(
                    "OK",
                    "Store check passed.",
                    Some("check"),
                    AppExit::Success as u8,
                    repair_notes,
                    json!({
                        "bus": bus_side.to_json(),
                        "dead_letters": dlq_side.to_json(),
                    }),
                );
            } else {
                println!("Store check passed!");
                print_store_line("Bus:         ", &bus_side);
                print_store_line("Dead letters:", &dlq_side);
            }
        }
        Commands::Providers => {
            let mappings: Vec<Value> = all_mappings()
                .iter()
                .map(|mapping| {
                    json!({
                        "provider": mapping.provider.as_str(),
                        "event_type_path": mapping.event_type_path,
                        "timestamp_path": mapping.timestamp_path,
                        "resource_id_path": mapping.resource_id_path,
                        "required_fields": mapping.required_fields,
                        "translations": mapping.translation.len(),
                    })
                })
                .collect();
            if mode == OutputMode::Json {
                emit_json_success(
                    "OK",
                    "Provider mappings listed.",
                    Some("providers"),
                    AppExit::Success as u8,
                    repair_notes,
                    json!({
                        "providers": mappings,
                        "unified_event_types": UnifiedEventType::NAMES,
                    }),
                );
            } else {
                println!("Registered providers:");
                for mapping in all_mappings() {
                    println!("  {}:", mapping.provider);
                    println!("    event type path:  {}", mapping.event_type_path);
                    println!("    timestamp path:   {}", mapping.timestamp_path);
                    println!("    resource id path: {}", mapping.resource_id_path);
                    println!(
                        "    required fields:  {}",
                        mapping.required_fields.join(", ")
                    );
                    println!("    translations:     {}", mapping.translation.len());
                }
                println!();
                println!(
                    "Unified event types: {}",
                    UnifiedEventType::NAMES.join(", ")
                );
            }
        }
    }

    AppExit::Success
}
