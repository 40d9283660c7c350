//! Network tests against a loopback fake server
