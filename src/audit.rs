// Best-effort audit logging for admin actions

use sqlx::PgPool;

/// Record an admin action in the audit log.
///
/// Audit writes never abort the primary operation: failures are logged
/// and swallowed.
pub async fn log_action(pool: &PgPool, user_id: i32, action: &str, details: serde_json::Value) {
    let result = sqlx::query("INSERT INTO audit_logs (user_id, action, details) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(action)
        .bind(details)
        .execute(pool)
        .await;

    match result {
        Ok(_) => tracing::debug!("Audit log written: user_id={}, action={}", user_id, action),
        Err(e) => tracing::warn!(
            "Failed to write audit log (user_id={}, action={}): {}",
            user_id,
            action,
            e
        ),
    }
}
