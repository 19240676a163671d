use eventflow_account::AuthenticateInput;
use eventflow_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_authenticate() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);

    let err = cmd
        .authenticate(AuthenticateInput {
            email: "john@eventflow.localhost".to_owned(),
            password: "my_password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let id = helpers::create_account(&cmd, "john", "9876543210").await?;

    let err = cmd
        .authenticate(AuthenticateInput {
            email: "john@eventflow.localhost".to_owned(),
            password: "my_password3".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));

    let err = cmd
        .authenticate(AuthenticateInput {
            email: "john".to_owned(),
            password: "my_password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    let account = cmd
        .authenticate(AuthenticateInput {
            email: "JOHN@eventflow.localhost ".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?;
    assert_eq!(account.id, id);

    Ok(())
}
