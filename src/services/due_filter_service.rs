//! services/due_filter_service.rs
//! Decide qué recordatorios están vencidos: fecha + hora locales, interpretadas
//! en la zona del recordatorio y comparadas en UTC contra un único "ahora".

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{
    error::{ReminderError, ReminderResult},
    models::reminder_model::Reminder,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%H:%M:%S%.f"];

#[derive(Debug, Default)]
pub struct DueSelection {
    pub due: Vec<Reminder>,
    pub not_due: usize,
    /// Registros con fecha/hora/zona inválida
    pub skipped: usize,
}

/// Fecha/hora del recordatorio en su propia zona horaria.
pub fn local_datetime(reminder: &Reminder) -> ReminderResult<DateTime<Tz>> {
    let tz = Tz::from_str_insensitive(reminder.timezone.trim()).map_err(|e| {
        ReminderError::record(
            &reminder.id,
            format!("invalid timezone '{}': {}", reminder.timezone, e),
        )
    })?;

    let naive = parse_naive(reminder)?;

    // Ambigua (fin de horario de verano) -> la más temprana.
    // Inexistente (inicio de horario de verano) -> se interpreta con el offset
    // previo al salto, o sea se corre hacia adelante lo que dure el hueco.
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Ok(dt);
    }

    let before = tz
        .from_local_datetime(&(naive - Duration::days(1)))
        .earliest()
        .ok_or_else(|| {
            ReminderError::record(
                &reminder.id,
                format!("local time {} does not exist in {}", naive, tz.name()),
            )
        })?;
    let offset_secs = i64::from(before.offset().fix().local_minus_utc());
    let utc_naive = naive - Duration::seconds(offset_secs);

    Ok(Utc.from_utc_datetime(&utc_naive).with_timezone(&tz))
}

/// Instante de vencimiento en UTC
pub fn due_instant(reminder: &Reminder) -> ReminderResult<DateTime<Utc>> {
    Ok(local_datetime(reminder)?.with_timezone(&Utc))
}

pub fn is_due(reminder: &Reminder, now: DateTime<Utc>) -> ReminderResult<bool> {
    Ok(due_instant(reminder)? <= now)
}

/// Separa los vencidos. Un registro inválido se loguea y se salta; nunca corta el lote.
pub fn select_due(reminders: Vec<Reminder>, now: DateTime<Utc>) -> DueSelection {
    let mut selection = DueSelection::default();

    for reminder in reminders {
        match is_due(&reminder, now) {
            Ok(true) => selection.due.push(reminder),
            Ok(false) => {
                log::debug!(
                    "(select_due) Recordatorio {} todavía no vence ({} {} {})",
                    reminder.id,
                    reminder.date,
                    reminder.time,
                    reminder.timezone
                );
                selection.not_due += 1;
            }
            Err(e) => {
                log::error!("(select_due) Error procesando recordatorio {}: {}", reminder.id, e);
                selection.skipped += 1;
            }
        }
    }

    log::info!(
        "(select_due) {} vencidos, {} pendientes, {} inválidos (now={})",
        selection.due.len(),
        selection.not_due,
        selection.skipped,
        now.to_rfc3339()
    );
    selection
}

fn parse_naive(reminder: &Reminder) -> ReminderResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(reminder.date.trim(), DATE_FORMAT).map_err(|e| {
        ReminderError::record(&reminder.id, format!("invalid date '{}': {}", reminder.date, e))
    })?;

    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(reminder.time.trim(), fmt).ok())
        .ok_or_else(|| {
            ReminderError::record(&reminder.id, format!("invalid time '{}'", reminder.time))
        })?;

    Ok(date.and_time(time))
}
