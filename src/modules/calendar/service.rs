use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{CalendarEvent, CalendarEventDto, CalendarFilterParams};

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, event_type, academic_year, student_years, location, created_by, updated_by, created_at, updated_at";

pub struct CalendarService;

impl CalendarService {
    /// Events ordered by start. A `student_year` filter matches events for
    /// `all` years or whose comma list contains that year.
    #[instrument(skip(db))]
    pub async fn get_events(
        db: &PgPool,
        filters: &CalendarFilterParams,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"SELECT {EVENT_COLUMNS} FROM calendar_events
               WHERE ($1::text IS NULL OR academic_year = $1)
                 AND ($2::text IS NULL OR LOWER(event_type) = LOWER($2))
                 AND ($3::int IS NULL OR EXTRACT(MONTH FROM start_date)::int = $3)
                 AND ($4::text IS NULL
                      OR student_years = 'all'
                      OR $4 = ANY(string_to_array(REPLACE(student_years, ' ', ''), ',')))
               ORDER BY start_date"#
        ))
        .bind(&filters.academic_year)
        .bind(filters.event_type_filter())
        .bind(filters.calendar_month())
        .bind(filters.student_year_filter())
        .fetch_all(db)
        .await
        .context("Failed to fetch calendar events")
        .map_err(AppError::database)?;

        Ok(events)
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_event(
        db: &PgPool,
        dto: CalendarEventDto,
        created_by: Uuid,
    ) -> Result<CalendarEvent, AppError> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"INSERT INTO calendar_events (title, description, start_date, end_date, event_type,
                                            academic_year, student_years, location, created_by,
                                            updated_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
               RETURNING {EVENT_COLUMNS}"#
        ))
        .bind(dto.title.trim())
        .bind(dto.description())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.event_type.trim())
        .bind(dto.academic_year.trim())
        .bind(dto.student_years())
        .bind(dto.location())
        .bind(created_by)
        .fetch_one(db)
        .await
        .context("Failed to insert calendar event")
        .map_err(AppError::database)?;

        Ok(event)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_event(
        db: &PgPool,
        id: Uuid,
        dto: CalendarEventDto,
        updated_by: Uuid,
    ) -> Result<CalendarEvent, AppError> {
        sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"UPDATE calendar_events SET
                   title = $2,
                   description = $3,
                   start_date = $4,
                   end_date = $5,
                   event_type = $6,
                   academic_year = $7,
                   student_years = $8,
                   location = $9,
                   updated_by = $10,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {EVENT_COLUMNS}"#
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(dto.description())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.event_type.trim())
        .bind(dto.academic_year.trim())
        .bind(dto.student_years())
        .bind(dto.location())
        .bind(updated_by)
        .fetch_optional(db)
        .await
        .context("Failed to update calendar event")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Event not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_event(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete calendar event")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Event not found")));
        }
        Ok(())
    }
}
