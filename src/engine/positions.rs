use crate::domain::{SeatIndex, Table};

/// Найти следующее место, ещё участвующее в матче, по кругу (включая/исключая start).
pub fn next_seated(table: &Table, start: SeatIndex, include_start: bool) -> Option<SeatIndex> {
    let max = table.seats.len();
    if max == 0 {
        return None;
    }

    let mut idx = start % max;
    if !include_start {
        idx = (idx + 1) % max;
    }

    for _ in 0..max {
        if table.seats[idx].is_seated() {
            return Some(idx);
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Все места в матче по кругу, начиная со start.
pub fn seated_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.seats.len();
    if max == 0 {
        return Vec::new();
    }

    (0..max)
        .map(|i| (start + i) % max)
        .filter(|&idx| table.seats[idx].is_seated())
        .collect()
}

/// Места, которые ещё могут ставить, по кругу начиная со start.
pub fn actors_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    seated_from(table, start)
        .into_iter()
        .filter(|&idx| table.seats[idx].can_act())
        .collect()
}

/// То же, но сразу после `after`; сам `after` не входит.
pub fn actors_after(table: &Table, after: SeatIndex) -> Vec<SeatIndex> {
    actors_from(table, after + 1)
        .into_iter()
        .filter(|&idx| idx != after)
        .collect()
}

/// Кнопка для новой раздачи: текущая, если место ещё в игре, иначе следующее занятое.
pub fn dealer_for_new_hand(table: &Table) -> Option<SeatIndex> {
    next_seated(table, table.dealer_button, true)
}

/// Куда сдвинуть кнопку после раздачи.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    next_seated(table, table.dealer_button, false)
}
