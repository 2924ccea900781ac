#![cfg(all(unix, feature = "cli"))]

use std::net::{SocketAddr, UdpSocket};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

const MASTER_ID: &[u8] = b"00000001";

fn bind_master() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("master socket should bind");
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout should apply");
    let addr = socket.local_addr().expect("master should have an address");
    (socket, addr)
}

fn recv(socket: &UdpSocket) -> (Vec<u8>, SocketAddr) {
    let mut buf = [0u8; 512];
    let (len, from) = socket.recv_from(&mut buf).expect("master should receive");
    (buf[..len].to_vec(), from)
}

fn reply(signature: &[u8], salt: &[u8]) -> Vec<u8> {
    [signature, MASTER_ID, salt].concat()
}

fn connect(master: SocketAddr, extra: &[&str]) -> Output {
    let master = master.to_string();
    let mut args = vec![
        "--log-level",
        "error",
        "connect",
        "--master",
        &master,
        "--id",
        "204342",
        "--auth-key",
        "passw0rd",
        "--local",
        "127.0.0.1:0",
        "--login-timeout",
        "5s",
        "--format",
        "json",
    ];
    args.extend_from_slice(extra);
    Command::new(env!("CARGO_BIN_EXE_dmrlink"))
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("connect should run")
}

#[test]
fn login_rejection_exits_auth_rejected() {
    let (socket, addr) = bind_master();
    let master = thread::spawn(move || {
        let (login, from) = recv(&socket);
        socket
            .send_to(&reply(b"MSTNAK", b""), from)
            .expect("nak should send");
        login
    });

    let output = connect(addr, &[]);
    let login = master.join().expect("master thread should finish");

    assert_eq!(&login[..], b"RPTL00031E36");
    assert_eq!(
        output.status.code(),
        Some(50),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn prints_relayed_frame_and_closes() {
    let (socket, addr) = bind_master();
    let master = thread::spawn(move || {
        let (login, from) = recv(&socket);
        assert!(login.starts_with(b"RPTL"));
        socket
            .send_to(&reply(b"RPTACK", b"0a1b2c3d"), from)
            .expect("challenge should send");

        let (key, _) = recv(&socket);
        assert!(key.starts_with(b"RPTK00031E36"));
        assert_eq!(key.len(), 12 + 64);
        socket
            .send_to(&reply(b"RPTACK", b""), from)
            .expect("ack should send");

        let mut frame = Vec::with_capacity(53);
        frame.extend_from_slice(b"DMRD");
        frame.push(1);
        frame.extend_from_slice(&[0x1F, 0x2C, 0xA4, 0x00, 0x00, 0x09]);
        frame.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        frame.push(0x1B);
        frame.extend_from_slice(&[0xCA, 0xFE, 0x00, 0x01]);
        frame.extend_from_slice(&[0u8; 33]);

        let mut seen = Vec::new();
        loop {
            let (packet, _) = recv(&socket);
            if packet.starts_with(b"RPTC") && !packet.starts_with(b"RPTCL") {
                socket.send_to(&frame, from).expect("frame should send");
            }
            let closing = packet.starts_with(b"RPTCL");
            seen.push(packet);
            if closing {
                return seen;
            }
        }
    });

    let output = connect(addr, &["--count", "1"]);
    let seen = master.join().expect("master thread should finish");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let line = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(line.trim()).expect("frame should print as JSON");
    assert_eq!(json["src_id"], 2_043_044);
    assert_eq!(json["stream_id"], "cafe0001");
    assert!(json["timestamp"].is_string());

    let config = seen
        .iter()
        .find(|p| p.starts_with(b"RPTC") && !p.starts_with(b"RPTCL"))
        .expect("configuration record should be sent");
    assert_eq!(config.len(), 306);
    assert_eq!(seen.last().map(|p| &p[..]), Some(&b"RPTCL00031E36"[..]));
}
