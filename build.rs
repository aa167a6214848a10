fn main() {
    println!("cargo:rerun-if-env-changed=WALET_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WALET_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=WALET_MQTT_URL");
    println!("cargo:rerun-if-env-changed=WALET_MQTT_CLIENT_ID");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
