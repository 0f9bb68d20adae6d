//! Checkout / return lifecycle and availability accounting

use chrono::{Duration, Utc};
use libris_server::{
    models::{CreateLoan, LoanStatus},
    AppError,
};

use crate::common::{
    add_book, add_patron, available_copies, checkout, loan_count, set_loan_dates, setup, setup_on_disk,
};

#[tokio::test]
async fn test_single_copy_scenario() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 1).await;
    let alice = add_patron(&state, "Alice").await;
    let bob = add_patron(&state, "Bob").await;

    let loan = state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: alice.id,
            book_id: book.id,
            duration_days: Some(14),
        })
        .await
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.due_at - loan.loaned_at, Duration::days(14));
    assert_eq!(available_copies(&state, book.id).await, 0);

    let second = state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: bob.id,
            book_id: book.id,
            duration_days: Some(14),
        })
        .await;
    assert!(matches!(second, Err(AppError::Unavailable(_))));

    let returned = state.services.loans.return_loan(loan.id).await.unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    let returned_at = returned.returned_at.expect("returned loan must carry a return date");
    assert!(returned_at >= returned.loaned_at);
    assert_eq!(available_copies(&state, book.id).await, 1);
}

#[tokio::test]
async fn test_default_duration_is_fourteen_days() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 2).await;
    let patron = add_patron(&state, "Carla").await;

    let loan = checkout(&state, &patron, &book).await;
    assert_eq!(loan.due_at - loan.loaned_at, Duration::days(14));
}

#[tokio::test]
async fn test_checkout_then_return_restores_availability() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 3).await;
    let patron = add_patron(&state, "Dora").await;

    let before = available_copies(&state, book.id).await;
    let loan = checkout(&state, &patron, &book).await;
    assert_eq!(available_copies(&state, book.id).await, before - 1);

    state.services.loans.return_loan(loan.id).await.unwrap();
    assert_eq!(available_copies(&state, book.id).await, before);
}

#[tokio::test]
async fn test_unavailable_checkout_has_no_side_effects() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 1).await;
    let first = add_patron(&state, "Edu").await;
    let second = add_patron(&state, "Fia").await;
    checkout(&state, &first, &book).await;

    let loans_before = loan_count(&state).await;
    let result = state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: second.id,
            book_id: book.id,
            duration_days: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
    assert_eq!(loan_count(&state).await, loans_before);
    assert_eq!(available_copies(&state, book.id).await, 0);
}

#[tokio::test]
async fn test_missing_book_is_unavailable() {
    let state = setup().await;
    let patron = add_patron(&state, "Gil").await;

    let result = state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: patron.id,
            book_id: 999,
            duration_days: None,
        })
        .await;
    assert!(matches!(result, Err(AppError::Unavailable(_))));
}

#[tokio::test]
async fn test_missing_patron_rolls_back_decrement() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 2).await;

    let result = state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: 424242,
            book_id: book.id,
            duration_days: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(available_copies(&state, book.id).await, 2);
    assert_eq!(loan_count(&state).await, 0);
}

#[tokio::test]
async fn test_invalid_duration_is_rejected() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 1).await;
    let patron = add_patron(&state, "Hugo").await;

    for days in [0, -1] {
        let result = state
            .services
            .loans
            .checkout(CreateLoan {
                patron_id: patron.id,
                book_id: book.id,
                duration_days: Some(days),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert_eq!(available_copies(&state, book.id).await, 1);
}

#[tokio::test]
async fn test_double_return_fails_without_mutation() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 2).await;
    let patron = add_patron(&state, "Ines").await;
    let other = add_patron(&state, "Joao").await;

    let loan = checkout(&state, &patron, &book).await;
    checkout(&state, &other, &book).await;
    let first = state.services.loans.return_loan(loan.id).await.unwrap();
    assert_eq!(available_copies(&state, book.id).await, 1);

    let second = state.services.loans.return_loan(loan.id).await;
    assert!(matches!(second, Err(AppError::AlreadyReturned(_))));
    assert_eq!(available_copies(&state, book.id).await, 1);

    let stored = state.services.loans.get_loan(loan.id).await.unwrap();
    assert_eq!(stored.returned_at, first.returned_at);
}

#[tokio::test]
async fn test_return_unknown_loan() {
    let state = setup().await;
    let result = state.services.loans.return_loan(77).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_return_with_full_shelf_is_integrity_error() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 1).await;
    let patron = add_patron(&state, "Kai").await;
    let loan = checkout(&state, &patron, &book).await;

    // Corrupt the counter behind the ledger's back
    sqlx::query("UPDATE books SET available_copies = total_copies WHERE id = ?")
        .bind(book.id)
        .execute(&state.pool)
        .await
        .unwrap();

    let result = state.services.loans.return_loan(loan.id).await;
    assert!(matches!(result, Err(AppError::DataIntegrity(_))));

    // Rolled back: the loan is still open
    let stored = state.services.loans.get_loan(loan.id).await.unwrap();
    assert_eq!(stored.status, LoanStatus::Active);
    assert!(stored.returned_at.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_never_oversell() {
    let (_dir, state) = setup_on_disk().await;
    let copies = 3;
    let attempts = 20;
    let book = add_book(&state, "isbn-1", copies).await;

    let mut patrons = Vec::new();
    for i in 0..attempts {
        patrons.push(add_patron(&state, &format!("Reader {}", i)).await);
    }

    let mut handles = Vec::new();
    for patron in patrons {
        let services = state.services.clone();
        let book_id = book.id;
        handles.push(tokio::spawn(async move {
            services
                .loans
                .checkout(CreateLoan {
                    patron_id: patron.id,
                    book_id,
                    duration_days: None,
                })
                .await
        }));
    }

    let mut succeeded = 0;
    let mut unavailable = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AppError::Unavailable(_)) => unavailable += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(succeeded, copies);
    assert_eq!(unavailable, attempts - copies);
    assert_eq!(available_copies(&state, book.id).await, 0);
    assert_eq!(loan_count(&state).await, copies);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkout_return_cycles_keep_count() {
    let (_dir, state) = setup_on_disk().await;
    let copies = 2;
    let workers = 8;
    let cycles = 10;
    let book = add_book(&state, "isbn-1", copies).await;

    let mut handles = Vec::new();
    for i in 0..workers {
        let patron = add_patron(&state, &format!("Cycler {}", i)).await;
        let services = state.services.clone();
        let book_id = book.id;
        handles.push(tokio::spawn(async move {
            let mut completed: i64 = 0;
            for _ in 0..cycles {
                let request = CreateLoan {
                    patron_id: patron.id,
                    book_id,
                    duration_days: None,
                };
                match services.loans.checkout(request).await {
                    Ok(loan) => {
                        services.loans.return_loan(loan.id).await?;
                        completed += 1;
                    }
                    Err(AppError::Unavailable(_)) => tokio::task::yield_now().await,
                    Err(e) => return Err(e),
                }
            }
            Ok::<_, AppError>(completed)
        }));
    }

    let mut completed: i64 = 0;
    for handle in handles {
        completed += handle.await.unwrap().expect("checkout/return cycle failed");
    }

    assert!(completed > 0);
    assert_eq!(loan_count(&state).await, completed);
    assert_eq!(available_copies(&state, book.id).await, copies);
    assert!(state.services.loans.get_active_loans().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_availability_stays_within_bounds() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 2).await;
    let patron = add_patron(&state, "Lia").await;

    let mut open = Vec::new();
    for step in 0..8 {
        if step % 3 == 2 {
            if let Some(loan_id) = open.pop() {
                state.services.loans.return_loan(loan_id).await.unwrap();
            }
        } else if let Ok(loan) = state
            .services
            .loans
            .checkout(CreateLoan {
                patron_id: patron.id,
                book_id: book.id,
                duration_days: None,
            })
            .await
        {
            open.push(loan.id);
        }

        let stored = state.services.catalog.get_book(book.id).await.unwrap();
        assert!(stored.available_copies >= 0);
        assert!(stored.available_copies <= stored.total_copies);
        assert_eq!(stored.available_copies, stored.total_copies - open.len() as i64);
    }
}

#[tokio::test]
async fn test_loan_listings() {
    let state = setup().await;
    let book = add_book(&state, "isbn-1", 3).await;
    let patron = add_patron(&state, "Mia").await;

    let late = checkout(&state, &patron, &book).await;
    let on_time = checkout(&state, &patron, &book).await;
    let closed = checkout(&state, &patron, &book).await;
    state.services.loans.return_loan(closed.id).await.unwrap();

    let now = Utc::now();
    set_loan_dates(&state, late.id, now - Duration::days(20), now - Duration::days(6)).await;

    let active = state.services.loans.get_active_loans().await.unwrap();
    assert_eq!(active.iter().map(|l| l.id).collect::<Vec<_>>(), vec![late.id, on_time.id]);

    let overdue = state.services.loans.get_overdue_loans().await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, late.id);
    assert!(overdue[0].is_overdue);
    assert_eq!(overdue[0].patron_name, "Mia");

    let all = state.services.loans.get_patron_loans(patron.id, false).await.unwrap();
    assert_eq!(all.len(), 3);
    let open = state.services.loans.get_patron_loans(patron.id, true).await.unwrap();
    assert_eq!(open.len(), 2);

    let missing = state.services.loans.get_patron_loans(999, false).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
