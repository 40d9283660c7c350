//! Command Encoding Tests

use sqclient::protocol::{Command, ParamValue};

fn params(pairs: Vec<(&str, ParamValue)>) -> Vec<(String, ParamValue)> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn test_bare_command() {
    let cmd = Command::new("version", vec![], vec![]);
    assert_eq!(cmd.text(), "version");
    assert_eq!(cmd.name(), "version");
}

#[test]
fn test_options_then_parameters() {
    let cmd = Command::new(
        "clientlist",
        vec!["uid".to_string(), "away".to_string()],
        vec![],
    );
    assert_eq!(cmd.text(), "clientlist -uid -away");

    let cmd = Command::new(
        "login",
        vec![],
        params(vec![
            ("client_login_name", "serveradmin".into()),
            ("client_login_password", "p@ss word".into()),
        ]),
    );
    assert_eq!(
        cmd.text(),
        "login client_login_name=serveradmin client_login_password=p@ss\\sword"
    );
}

#[test]
fn test_list_parameter_joined_with_pipe() {
    let cmd = Command::new(
        "clientkick",
        vec![],
        params(vec![
            ("clid", vec!["1", "2", "3"].into()),
            ("reasonid", 5i64.into()),
            ("reasonmsg", "Go away!".into()),
        ]),
    );
    assert_eq!(
        cmd.text(),
        "clientkick clid=1|clid=2|clid=3 reasonid=5 reasonmsg=Go\\saway!"
    );
}

#[test]
fn test_everything_is_escaped() {
    let cmd = Command::new(
        "odd name",
        vec!["a|b".to_string()],
        params(vec![("k/ey", "v\nal".into())]),
    );
    assert_eq!(cmd.text(), "odd\\sname -a\\pb k\\/ey=v\\nal");
}

#[test]
fn test_empty_list_parameter() {
    let cmd = Command::new("x", vec![], params(vec![("k", ParamValue::List(vec![]))]));
    assert_eq!(cmd.text(), "x ");
}

#[test]
fn test_accessors_keep_unescaped_input() {
    let cmd = Command::new(
        "sendtextmessage",
        vec![],
        params(vec![("msg", "hi there".into())]),
    );
    assert_eq!(cmd.options(), &[] as &[String]);
    assert_eq!(
        cmd.parameters(),
        &[("msg".to_string(), ParamValue::Single("hi there".to_string()))]
    );
}
