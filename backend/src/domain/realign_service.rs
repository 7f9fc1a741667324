//! Schedule realignment engine.
//!
//! Compacts a crew's single-day appointment sequence so that movable
//! jobs run back-to-back separated by the configured buffer. Jobs that
//! are `in-progress` or `completed` are anchors: the crew is already on
//! site or finished, so the engine never rewrites history around them.
//!
//! The engine only closes gaps forward — it never pulls a job earlier
//! than its current slot, so overlapping or back-to-back jobs are left
//! alone. That keeps the walk monotonic and idempotent: a second run
//! over a stable schedule finds no gaps and changes nothing.

use anyhow::Result;
use log::{debug, info};

use shared::{Appointment, AppointmentStatus, RealignChange};

use crate::domain::commands::appointments::AppointmentListQuery;
use crate::domain::commands::realign::{RealignCommand, RealignReport};
use crate::domain::time_grid;
use crate::storage::memory::{AppointmentRepository, CrewRepository, SettingsRepository};
use crate::storage::traits::{AppointmentStorage, CrewStorage, SettingsStorage};

/// Service that realigns crew schedules.
#[derive(Clone)]
pub struct RealignService {
    appointments: AppointmentRepository,
    crews: CrewRepository,
    settings: SettingsRepository,
}

impl RealignService {
    /// Create a new RealignService.
    pub fn new(
        appointments: AppointmentRepository,
        crews: CrewRepository,
        settings: SettingsRepository,
    ) -> Self {
        Self {
            appointments,
            crews,
            settings,
        }
    }

    /// Run a realignment pass and report every start-time rewrite.
    ///
    /// With no date, every distinct date in the store is processed. With
    /// no crew, every crew is processed for each date (the historical
    /// default); a crew id switches to single-crew mode.
    pub fn realign(&self, command: RealignCommand) -> Result<RealignReport> {
        let buffer_minutes = self.settings.get_settings()?.buffer_minutes;

        let dates = match command.date {
            Some(date) => vec![date],
            None => self.appointments.distinct_dates()?,
        };
        let crew_ids: Vec<String> = match command.crew_id {
            Some(crew_id) => vec![crew_id],
            None => self
                .crews
                .list_crews()?
                .into_iter()
                .map(|crew| crew.id)
                .collect(),
        };

        info!(
            "Realigning {} date(s) across {} crew(s) with {}min buffer",
            dates.len(),
            crew_ids.len(),
            buffer_minutes
        );

        let mut report = RealignReport::default();
        for date in &dates {
            for crew_id in &crew_ids {
                self.realign_crew_day(date, crew_id, buffer_minutes, &mut report)?;
            }
        }

        info!("Realign moved {} appointment(s)", report.changes.len());
        Ok(report)
    }

    /// Compact one crew's schedule for one date.
    fn realign_crew_day(
        &self,
        date: &str,
        crew_id: &str,
        buffer_minutes: u32,
        report: &mut RealignReport,
    ) -> Result<()> {
        let mut day: Vec<Appointment> = self
            .appointments
            .list_appointments(&AppointmentListQuery {
                date: Some(date.to_string()),
                crew_id: Some(crew_id.to_string()),
                ..AppointmentListQuery::default()
            })?
            .into_iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .collect();

        self.compact_day(date, crew_id, buffer_minutes, &mut day, report)
    }

    /// Walk one crew-day list, writing moves back to the store.
    fn compact_day(
        &self,
        date: &str,
        crew_id: &str,
        buffer_minutes: u32,
        day: &mut [Appointment],
        report: &mut RealignReport,
    ) -> Result<()> {
        // Nothing to compact with fewer than two jobs.
        if day.len() < 2 {
            return Ok(());
        }

        // The earliest job is never moved; it seeds the walk.
        let mut next_available = day[0].end_minutes() + buffer_minutes;

        for appointment in day.iter_mut().skip(1) {
            if appointment.status.is_anchor() {
                next_available = appointment.end_minutes() + buffer_minutes;
                continue;
            }

            let current_start = appointment.start_minutes();
            if current_start > next_available {
                let previous_start =
                    time_grid::format_time(appointment.start_hour, appointment.start_minute);
                let (hour, minute) = time_grid::from_minutes(next_available);
                appointment.start_hour = hour;
                appointment.start_minute = minute;

                // A concurrent delete makes this write a no-op; the slot
                // it would have occupied stays reserved either way, but
                // only a write that landed is reported.
                if self.appointments.update_appointment(appointment)? {
                    report.changes.push(RealignChange {
                        appointment_id: appointment.id.clone(),
                        crew_id: crew_id.to_string(),
                        date: date.to_string(),
                        previous_start,
                        new_start: time_grid::format_time(hour, minute),
                    });
                } else {
                    debug!(
                        "Appointment {} vanished mid-realign, skipping write",
                        appointment.id
                    );
                }
                next_available += appointment.duration_minutes + buffer_minutes;
            } else {
                // No gap (or the job already starts earlier): leave it
                // where it is and walk on from its current slot.
                next_available = current_start + appointment.duration_minutes + buffer_minutes;
            }
        }

        Ok(())
    }
}
