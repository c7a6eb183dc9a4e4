/// Integration tests covering the full operation layer against a real
/// SQLite database
use chrono::NaiveDate;
use habit_tracker_core::ops::habits;
use habit_tracker_core::ops::tasks;
use habit_tracker_core::*;
use tempfile::NamedTempFile;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("Failed to open in-memory store")
}

fn add_habit(store: &mut SqliteStore, name: &str) -> HabitId {
    habits::create_habit(
        store,
        CreateHabitParams {
            name: name.to_string(),
            reminder_time: None,
        },
    )
    .expect("Failed to create habit")
    .id
}

#[cfg(test)]
mod habit_lifecycle_tests {
    use super::*;

    #[test]
    fn test_create_and_list_habits() {
        let mut store = open_store();
        add_habit(&mut store, "Drink Water");
        add_habit(&mut store, "Read");

        let listed = habits::list_habits(&store, day(2025, 3, 10)).unwrap();
        assert_eq!(listed.len(), 2);
        // Insertion order
        assert_eq!(listed[0].name, "Drink Water");
        assert_eq!(listed[1].name, "Read");
        assert!(listed.iter().all(|h| h.streak == 0 && !h.done_today));
    }

    #[test]
    fn test_habit_view_serializes_for_the_route_layer() {
        let mut store = open_store();
        let view = habits::create_habit(
            &mut store,
            CreateHabitParams {
                name: "Read".to_string(),
                reminder_time: Some("07:30".to_string()),
            },
        )
        .unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Read");
        assert_eq!(json["streak"], 0);
        assert_eq!(json["reminder_time"], "07:30");
        assert_eq!(json["done_today"], false);
        assert!(json["last_done"].is_null());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = open_store();
        add_habit(&mut store, "Drink Water");

        let result = habits::create_habit(
            &mut store,
            CreateHabitParams {
                name: "Drink Water".to_string(),
                reminder_time: None,
            },
        );
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_edit_rename_and_clear_reminder() {
        let mut store = open_store();
        let id = habits::create_habit(
            &mut store,
            CreateHabitParams {
                name: "Jog".to_string(),
                reminder_time: Some("07:00".to_string()),
            },
        )
        .unwrap()
        .id;

        let view = habits::edit_habit(
            &mut store,
            id,
            EditHabitParams {
                name: Some("Morning Run".to_string()),
                reminder_time: Some("".to_string()),
            },
        )
        .unwrap();

        assert_eq!(view.name, "Morning Run");
        assert!(view.reminder_time.is_none());
    }

    #[test]
    fn test_edit_cannot_take_existing_name() {
        let mut store = open_store();
        add_habit(&mut store, "Read");
        let id = add_habit(&mut store, "Jog");

        let result = habits::edit_habit(
            &mut store,
            id,
            EditHabitParams {
                name: Some("Read".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(TrackerError::Validation(_))));
    }

    #[test]
    fn test_delete_habit_removes_everything() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Read");
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();

        habits::delete_habit(&mut store, id).unwrap();

        let result = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10));
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
        assert!(habits::list_habits(&store, day(2025, 3, 10))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_unknown_habit_is_not_found() {
        let mut store = open_store();
        let result = habits::delete_habit(&mut store, HabitId::new());
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }
}

#[cfg(test)]
mod streak_scenario_tests {
    use super::*;

    #[test]
    fn test_first_completion_starts_streak() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        let outcome = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        assert_eq!(outcome.habit.streak, 1);
        assert_eq!(outcome.habit.last_done, Some(day(2025, 3, 10)));
        assert!(!outcome.message.is_empty());
    }

    #[test]
    fn test_double_complete_same_day_is_idempotent() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        let second = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();

        assert_eq!(second.habit.streak, 1);
        assert_eq!(second.habit.last_done, Some(day(2025, 3, 10)));
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        let second = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
        assert_eq!(second.habit.streak, 2);

        let third = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 12)).unwrap();
        assert_eq!(third.habit.streak, 3);
    }

    #[test]
    fn test_gap_resets_streak_to_one() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        let after_gap = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 13)).unwrap();

        assert_eq!(after_gap.habit.streak, 1);
        assert_eq!(after_gap.habit.last_done, Some(day(2025, 3, 13)));
    }

    #[test]
    fn test_streak_continues_across_month_boundary() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 31)).unwrap();
        let next = habits::complete_habit_on(&mut store, &coach, id, day(2025, 4, 1)).unwrap();
        assert_eq!(next.habit.streak, 2);
    }

    #[test]
    fn test_backfill_earlier_day_joins_existing_run() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
        // Backfilling the 10th closes the gap without regressing the cache
        let backfilled =
            habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        assert_eq!(backfilled.habit.streak, 2);
        assert_eq!(backfilled.habit.last_done, Some(day(2025, 3, 11)));

        let next = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 12)).unwrap();
        assert_eq!(next.habit.streak, 3);
        assert_eq!(next.habit.last_done, Some(day(2025, 3, 12)));
    }

    #[test]
    fn test_backfill_with_remaining_gap_keeps_newest_run() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
        let backfilled =
            habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 8)).unwrap();

        // The 8th is disconnected from the 11th, so the newest run still wins
        assert_eq!(backfilled.habit.streak, 1);
        assert_eq!(backfilled.habit.last_done, Some(day(2025, 3, 11)));
    }

    #[test]
    fn test_past_day_operations_report_todays_completion_state() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");
        let today = habit_tracker_core::domain::dates::today();
        let yesterday = today.pred_opt().unwrap();

        habits::complete_habit_on(&mut store, &coach, id, today).unwrap();

        // Backfilling yesterday must not clear the done-today flag
        let backfilled = habits::complete_habit_on(&mut store, &coach, id, yesterday).unwrap();
        assert!(backfilled.habit.done_today);
        assert_eq!(backfilled.habit.streak, 2);
        assert_eq!(backfilled.habit.last_done, Some(today));

        // Undoing yesterday leaves today's entry (and its flag) in place
        let reverted = habits::uncomplete_habit_on(&mut store, id, yesterday).unwrap();
        assert!(reverted.done_today);
        assert_eq!(reverted.streak, 1);
        assert_eq!(reverted.last_done, Some(today));
    }

    #[test]
    fn test_uncomplete_round_trip_restores_state() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();

        let reverted = habits::uncomplete_habit_on(&mut store, id, day(2025, 3, 11)).unwrap();
        assert_eq!(reverted.streak, 1);
        assert_eq!(reverted.last_done, Some(day(2025, 3, 10)));
        assert!(!reverted.done_today);
    }

    #[test]
    fn test_uncomplete_recomputes_from_ledger_not_decrement() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        // Ledger: 10th, 11th, 12th
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 12)).unwrap();

        // Removing the terminal day leaves the 10th-11th run intact
        let view = habits::uncomplete_habit_on(&mut store, id, day(2025, 3, 12)).unwrap();
        assert_eq!(view.streak, 2);
        assert_eq!(view.last_done, Some(day(2025, 3, 11)));
    }

    #[test]
    fn test_uncomplete_middle_day_splits_run() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 12)).unwrap();

        // Removing the middle day leaves only the 12th as the newest run
        let view = habits::uncomplete_habit_on(&mut store, id, day(2025, 3, 11)).unwrap();
        assert_eq!(view.streak, 1);
        assert_eq!(view.last_done, Some(day(2025, 3, 12)));
    }

    #[test]
    fn test_uncomplete_only_entry_resets_to_zero() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        let view = habits::uncomplete_habit_on(&mut store, id, day(2025, 3, 10)).unwrap();

        assert_eq!(view.streak, 0);
        assert!(view.last_done.is_none());
    }

    #[test]
    fn test_uncomplete_without_entry_is_noop() {
        let mut store = open_store();
        let id = add_habit(&mut store, "Drink Water");

        let view = habits::uncomplete_habit_on(&mut store, id, day(2025, 3, 10)).unwrap();
        assert_eq!(view.streak, 0);
        assert!(view.last_done.is_none());
    }
}

#[cfg(test)]
mod archive_tests {
    use super::*;

    #[test]
    fn test_archived_habit_cannot_be_completed() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Read");

        habits::set_archived(&mut store, id, true).unwrap();
        let result = habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10));
        assert!(matches!(result, Err(TrackerError::InvalidState(_))));
    }

    #[test]
    fn test_archived_habit_excluded_from_active_listing() {
        let mut store = open_store();
        let kept = add_habit(&mut store, "Read");
        let shelved = add_habit(&mut store, "Jog");

        habits::set_archived(&mut store, shelved, true).unwrap();

        let active = habits::list_habits(&store, day(2025, 3, 10)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept);

        let archived = habits::list_archived_habits(&store, day(2025, 3, 10)).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, shelved);
    }

    #[test]
    fn test_unarchive_preserves_history() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let id = add_habit(&mut store, "Read");

        habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
        habits::set_archived(&mut store, id, true).unwrap();
        let view = habits::set_archived(&mut store, id, false).unwrap();

        assert_eq!(view.streak, 1);
        assert_eq!(view.last_done, Some(day(2025, 3, 10)));
    }
}

#[cfg(test)]
mod task_tests {
    use super::*;

    #[test]
    fn test_task_create_and_complete() {
        let mut store = open_store();
        let task = tasks::create_task(
            &mut store,
            CreateTaskParams {
                name: "Buy milk".to_string(),
                date: Some(day(2025, 3, 10)),
                reminder_time: None,
            },
        )
        .unwrap();
        assert!(!task.done);

        let done = tasks::complete_task(&mut store, task.id).unwrap();
        assert!(done.done);

        // Completing again is idempotent
        let again = tasks::complete_task(&mut store, task.id).unwrap();
        assert!(again.done);

        let undone = tasks::uncomplete_task(&mut store, task.id).unwrap();
        assert!(!undone.done);
    }

    #[test]
    fn test_tasks_scoped_to_their_day() {
        let mut store = open_store();
        tasks::create_task(
            &mut store,
            CreateTaskParams {
                name: "Buy milk".to_string(),
                date: Some(day(2025, 3, 10)),
                reminder_time: None,
            },
        )
        .unwrap();
        tasks::create_task(
            &mut store,
            CreateTaskParams {
                name: "Call dentist".to_string(),
                date: Some(day(2025, 3, 11)),
                reminder_time: None,
            },
        )
        .unwrap();

        let monday = tasks::list_tasks_on(&store, day(2025, 3, 10)).unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].name, "Buy milk");
    }

    #[test]
    fn test_delete_task() {
        let mut store = open_store();
        let task = tasks::create_task(
            &mut store,
            CreateTaskParams {
                name: "Buy milk".to_string(),
                date: Some(day(2025, 3, 10)),
                reminder_time: None,
            },
        )
        .unwrap();

        tasks::delete_task(&mut store, task.id).unwrap();
        assert!(tasks::list_tasks_on(&store, day(2025, 3, 10))
            .unwrap()
            .is_empty());

        let result = tasks::delete_task(&mut store, task.id);
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;
    use habit_tracker_core::analytics::DashboardStats;

    #[test]
    fn test_dashboard_counts_and_rates() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let today = day(2025, 3, 10);

        // 6 habits, 4 done today
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(add_habit(&mut store, &format!("Habit {}", i)));
        }
        for id in ids.iter().take(4) {
            habits::complete_habit_on(&mut store, &coach, *id, today).unwrap();
        }

        let views = habits::list_habits(&store, today).unwrap();
        let day_tasks = store.list_tasks_on(today).unwrap();
        let stats = DashboardStats::compute(&views, &day_tasks, today);

        assert_eq!(stats.habits.total, 6);
        assert_eq!(stats.habits.done_today, 4);
        assert!((stats.habits.completion_rate - 66.7).abs() < 0.05);
        assert_eq!(stats.streaks.best_streak, 1);
        assert_eq!(stats.streaks.active_streaks, 4);
    }

    #[test]
    fn test_archived_habits_excluded_from_stats() {
        let coach = FallbackCoach;
        let mut store = open_store();
        let today = day(2025, 3, 10);

        let kept = add_habit(&mut store, "Read");
        let shelved = add_habit(&mut store, "Jog");
        habits::complete_habit_on(&mut store, &coach, kept, today).unwrap();
        habits::complete_habit_on(&mut store, &coach, shelved, today).unwrap();
        habits::set_archived(&mut store, shelved, true).unwrap();

        let views = habits::list_habits(&store, today).unwrap();
        let stats = DashboardStats::compute(&views, &[], today);

        assert_eq!(stats.habits.total, 1);
        assert_eq!(stats.habits.done_today, 1);
        assert_eq!(stats.streaks.active_streaks, 1);
    }

    #[test]
    fn test_empty_dashboard_has_zero_rates() {
        let store = open_store();
        let today = day(2025, 3, 10);

        let views = habits::list_habits(&store, today).unwrap();
        let stats = DashboardStats::compute(&views, &[], today);

        assert_eq!(stats.habits.total, 0);
        assert_eq!(stats.habits.completion_rate, 0.0);
        assert_eq!(stats.tasks.completion_rate, 0.0);
        assert_eq!(stats.streaks.best_streak, 0);
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_state_survives_reopen() {
        let coach = FallbackCoach;
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let id = {
            let mut store = SqliteStore::new(db_path.clone()).unwrap();
            let id = add_habit(&mut store, "Drink Water");
            habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 10)).unwrap();
            habits::complete_habit_on(&mut store, &coach, id, day(2025, 3, 11)).unwrap();
            id
        };

        let store = SqliteStore::new(db_path).unwrap();
        let views = habits::list_habits(&store, day(2025, 3, 11)).unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, id);
        assert_eq!(views[0].streak, 2);
        assert_eq!(views[0].last_done, Some(day(2025, 3, 11)));
        assert!(views[0].done_today);
    }

    #[test]
    fn test_tracker_greeting_mentions_numbers() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        tracker
            .create_habit(CreateHabitParams {
                name: "Read".to_string(),
                reminder_time: None,
            })
            .unwrap();

        let greeting = tracker.greeting().unwrap();
        assert!(!greeting.is_empty());
    }
}
