use uuid::Uuid;

/// Короткий id партии: первые 8 hex-символов UUIDv4.
/// Для логов и GameOutcome этого хватает, глобальная уникальность не нужна.
pub fn new_game_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
