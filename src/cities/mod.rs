//! Belarusian cities offered by the search box and the city gallery.

pub mod handlers;

/// Maximum number of suggestions a search returns
pub const MAX_SUGGESTIONS: usize = 7;

/// Regional centres shown as quick picks
pub const POPULAR_CITIES: &[&str] = &["Минск", "Гомель", "Могилёв", "Витебск", "Гродно", "Брест"];

/// Every city the search box knows about
pub const ALL_CITIES: &[&str] = &[
    "Минск",
    "Гомель",
    "Могилёв",
    "Витебск",
    "Гродно",
    "Брест",
    "Бобруйск",
    "Барановичи",
    "Борисов",
    "Пинск",
    "Орша",
    "Мозырь",
    "Солигорск",
    "Новополоцк",
    "Лида",
    "Молодечно",
    "Полоцк",
    "Жлобин",
    "Светлогорск",
    "Речица",
    "Слуцк",
    "Кобрин",
    "Волковыск",
    "Калинковичи",
    "Сморгонь",
    "Рогачёв",
    "Осиповичи",
    "Горки",
    "Новогрудок",
    "Вилейка",
];

/// Cities whose name contains `term`, case-insensitively, in list order.
/// A blank term yields nothing.
pub fn search(term: &str, limit: usize) -> Vec<&'static str> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    ALL_CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
